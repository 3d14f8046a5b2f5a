// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Value types shared by the engine, the registry and the sinks.
//!
//! Items are kept as loosely typed JSON objects: the engine never interprets
//! a field other than the identity field a record kind declares, so there is
//! nothing to gain from a typed representation at this layer.

mod dispatch;
mod endpoint;
mod event;
mod time;

use serde_json::{Map, Value};

pub use dispatch::{Dispatch, DispatchOrigin, FinalizedSet};
pub use endpoint::EndpointKey;
pub use event::ResponseEvent;
pub(crate) use event::json_type_name;
pub use time::{Clock, SystemClock, Timestamp};

/// A single extracted record: field name -> scalar/string value.
pub type Item = Map<String, Value>;

/// One extraction's worth of items from a single response event.
pub type Batch = Vec<Item>;

/// A decoded response body. Always a JSON object.
pub type Payload = Map<String, Value>;
