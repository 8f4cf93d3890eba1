// src/aliases.rs
//! Secret types backed by secure-gate
//!
//! These are the canonical secret-holding types used throughout blackbox-envelope.

use secure_gate::fixed_alias;

// Fixed-size secrets
fixed_alias!(EnvelopeKey, 32); // 256-bit AES key, zeroized on drop
