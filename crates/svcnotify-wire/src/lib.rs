//! Variable store and wire codec for service notifications.
//!
//! A notification is a block of `KEY=VALUE\n` lines sent as one datagram:
//! - keys come from a closed protocol set or carry the `X_` extension prefix
//! - values are scalars stored in their text form
//! - lines keep the order in which keys were first set
//!
//! No envelope, no length prefix, no escaping.

pub mod codec;
pub mod error;
pub mod keys;
pub mod store;
pub mod value;

pub use codec::{decode_payload, encode_payload, KEY_VALUE_SEPARATOR, LINE_TERMINATOR};
pub use error::{Result, WireError};
pub use keys::{KeySet, EXTENSION_PREFIX, PROTOCOL_KEYS};
pub use store::{Rejection, SetOutcome, Variables};
pub use value::Value;
