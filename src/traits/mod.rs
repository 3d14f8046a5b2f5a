// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dispatcher;
pub mod record_kind;

pub use dispatcher::Dispatcher;
pub use record_kind::RecordKind;
