// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: decoding, cover correction transforms and header probes.

pub mod probe;
pub mod processor;

pub use probe::HeaderInfo;
pub use processor::{ImageHeader, ImageProcessor};
