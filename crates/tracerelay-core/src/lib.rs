//! Tracerelay Core - Domain logic and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `CrashRecord`, `ReportPayload`, `HostInfo`, `FailureEvent`
//! - **Port definitions** - Traits for adapters: `HostEnvironment`, `Processor`,
//!   `ReportTransport`, `InterceptorRegistry`
//! - **Configuration** - The write-once `Config` consumed before setup runs
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure parsing and payload logic with no I/O.
//! Ports define trait interfaces that the `tracerelay` adapter crate
//! implements (filesystem record store, HTTP transport, panic-hook registry).

pub mod config;
pub mod domain;
pub mod ports;
