// gitconductor: GitLab Group Mirror Tool
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
//!                |        clone / fan-out / viz
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, CLI layers   |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              remote       tree     state
//!            GitLab/mem   build,    file, lock,
//!                         locate    rebase
//!                             |
//!                      +------+------+
//!                      v             v
//!                  dispatch         viz
//!               jobs, reporters  tree/table/access
//!                      |
//!                      v
//!                     git   gix reads / CLI writes
//!
//!   +-----------------------------------------+
//!   |  foundation        error, logging       |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod logging;
pub mod remote;
pub mod state;
pub mod tree;
pub mod viz;
