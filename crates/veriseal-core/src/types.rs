//! Strong type definitions for Veriseal.
//!
//! All identifiers are newtypes to prevent misuse at compile time. Receipt,
//! agent, session, and task identifiers are opaque strings assigned by the
//! caller; the protocol never interprets them beyond byte equality.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a single receipt. Assigned once at signing time and
    /// carried verbatim inside the signed payload.
    ReceiptId
}

string_id! {
    /// Identifier of the agent that performed the action.
    AgentId
}

string_id! {
    /// Identifier of the account that owns the agent.
    OwnerId
}

string_id! {
    /// Identifier of a signing session. Sequence numbers are scoped to one
    /// session and start at 0.
    SessionId
}

string_id! {
    /// Identifier of the task a receipt belongs to. Batch certification
    /// groups receipts by task.
    TaskId
}
