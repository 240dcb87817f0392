// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native primitives. Each submodule adds methods to `NativeImage`.

pub mod arithmetic;
pub mod bands;
pub mod colour;
pub mod convolution;
