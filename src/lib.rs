/*
    FluxFox
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

//! # fluxcore
//!
//! `fluxcore` is the flux-imaging core of a floppy disk preservation toolkit: a bit-exact codec
//! for the SuperCardPro (SCP) flux container format, and a master-track/PLL flux decoder that
//! turns magnetic flux transitions into clocked bit streams.
//!
//! This crate deliberately knows nothing about sector content, disk formats above the flux layer,
//! or the hardware used to capture flux. It consumes and produces four small value types:
//!
//! - [`flux::FluxRecord`] — inter-transition intervals, index-mark positions, and a sample frequency.
//! - [`scp::ScpCodec`] — decodes/encodes the SCP container around [`flux::FluxRecord`]s.
//! - [`pll::RawTrack`] — a software PLL that decodes a [`flux::FluxRecord`] into bit streams.
//! - [`master_track::MasterTrack`] — a pristine bitcell track that projects to a [`flux::FluxRecord`].
//!
//! See each module for its own documentation.

pub mod flux;
pub mod master_track;
pub mod pll;
pub mod scp;

pub use flux::{FluxRecord, WriteoutFluxRecord};
pub use master_track::MasterTrack;
pub use pll::RawTrack;
pub use scp::{ScpCodec, ScpError};

/// The SCP sample clock: 40 MHz, i.e. one tick is 25ns. Fixed by the hardware this container
/// format was designed around.
pub const SCP_SAMPLE_FREQ_HZ: f64 = 40_000_000.0;
