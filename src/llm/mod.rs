// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Helpers for consuming generative model output

pub mod response;

pub use response::{decode_model_response, ModelResponseError};
