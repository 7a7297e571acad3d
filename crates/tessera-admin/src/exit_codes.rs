//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - invalid arguments or refused operation
pub const VALIDATION_ERROR: i32 = 2;

/// Configuration error - unresolvable connection settings or kubeconfig
pub const CONFIG_ERROR: i32 = 3;

/// Certificate error - key or certificate generation failed
pub const CERT_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// API error - the control plane rejected a request or is unreachable
pub const API_ERROR: i32 = 6;

/// Usage error - invalid flags or subcommands (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
