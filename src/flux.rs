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

    src/flux.rs

    The flux domain's central value type: a reading of magnetic flux transitions and index marks,
    independent of any container format.
*/

/// An immutable reading of captured magnetic flux for a single track.
///
/// `FluxRecord` is the common currency between the SCP codec and the PLL decoder. It never
/// carries format-specific details (cell widths, overflow sentinels, TLUT offsets); those are
/// entirely [`crate::scp`]'s concern.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxRecord {
    /// Ordered inter-transition intervals, in sample ticks.
    pub transitions: Vec<f64>,
    /// Ordered inter-index intervals, in sample ticks. Length equals the number of recorded
    /// revolutions (or revolutions + 1 if a partial revolution precedes the first index).
    pub index_ticks: Vec<f64>,
    /// Sample frequency of `transitions` and `index_ticks`, in Hz.
    pub sample_freq_hz: f64,
}

impl FluxRecord {
    pub fn new(transitions: Vec<f64>, index_ticks: Vec<f64>, sample_freq_hz: f64) -> Self {
        Self {
            transitions,
            index_ticks,
            sample_freq_hz,
        }
    }

    /// Number of revolutions this record covers.
    pub fn nr_revs(&self) -> usize {
        self.index_ticks.len()
    }

    /// Total sample ticks across all recorded transitions.
    pub fn total_transition_ticks(&self) -> f64 {
        self.transitions.iter().sum()
    }

    /// Total sample ticks across all recorded revolutions.
    pub fn total_index_ticks(&self) -> f64 {
        self.index_ticks.iter().sum()
    }
}

/// A [`FluxRecord`] destined for a write-out to real media, with an extra hint for the writer
/// hardware: whether it should stop writing as soon as it next observes an index pulse, rather
/// than writing the full buffer regardless.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteoutFluxRecord {
    pub flux: FluxRecord,
    /// When true, the writer should terminate the write at the next index pulse rather than
    /// writing the entire buffer. Set when the master track's splice sits within a few bitcells
    /// of the index (see [`crate::master_track`]'s splice alignment).
    pub terminate_at_index: bool,
}

impl WriteoutFluxRecord {
    pub fn new(flux: FluxRecord, terminate_at_index: bool) -> Self {
        Self {
            flux,
            terminate_at_index,
        }
    }
}

impl std::ops::Deref for WriteoutFluxRecord {
    type Target = FluxRecord;
    fn deref(&self) -> &FluxRecord {
        &self.flux
    }
}
