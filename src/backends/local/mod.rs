// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod json_array;

pub use factory::RecordKindFactory;
pub use json_array::JsonArrayKind;
