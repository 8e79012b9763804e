// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          run / status / next
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!                        pipeline
//!              CommitOrchestrator -> RunReport
//!                 |                    |
//!                 v                    v
//!               git                 backup
//!       status / stage / commit   version / executor
//!       push, gix discovery       _vN copies
//!
//!   +-----------------------------------------+
//!   |  foundation      error, logging         |
//!   +-----------------------------------------+
//! ```

pub mod backup;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod pipeline;
