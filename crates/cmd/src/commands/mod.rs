// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod check;
pub mod export;
pub mod init;
pub mod intervals;

pub use check::check_command;
pub use export::{ExportArgs, MergeArg, export_command};
pub use init::init_command;
pub use intervals::intervals_command;
