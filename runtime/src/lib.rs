// Copyright 2026 Signoff Contributors
// SPDX-License-Identifier: Apache-2.0

//! Signoff runtime: browser sessions, login, raw extraction, model-assisted
//! field derivation, and the spreadsheet batch.
//!
//! This library crate exposes the runtime modules for the binary and for
//! integration testing.

pub mod acquisition;
pub mod batch;
pub mod cli;
pub mod config;
pub mod derive;
pub mod live;
pub mod llm;
pub mod renderer;
