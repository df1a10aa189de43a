// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Injected current sources
//!
//! A current source contributes a time-dependent amplitude (nA) to every
//! cell it is attached to. Sources are evaluated once per step, before the
//! group updates.

/// Time-dependent injected current waveform
#[derive(Debug, Clone)]
pub enum CurrentSource {
    /// Constant amplitude inside [start, stop)
    Dc {
        amplitude: f64,
        start: f64,
        stop: f64,
    },
    /// Piecewise-constant amplitude: holds `amplitudes[i]` from `times[i]`
    /// until the next listed time. Zero before `times[0]`.
    Step {
        times: Vec<f64>,
        amplitudes: Vec<f64>,
    },
}

impl CurrentSource {
    /// Amplitude at simulation time `t` (ms).
    pub fn amplitude_at(&self, t: f64) -> f64 {
        match self {
            CurrentSource::Dc {
                amplitude,
                start,
                stop,
            } => {
                if t >= *start && t < *stop {
                    *amplitude
                } else {
                    0.0
                }
            }
            CurrentSource::Step { times, amplitudes } => {
                match times.iter().rposition(|time| *time <= t) {
                    Some(i) => amplitudes[i],
                    None => 0.0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_window() {
        let source = CurrentSource::Dc {
            amplitude: 0.5,
            start: 10.0,
            stop: 20.0,
        };
        assert_eq!(source.amplitude_at(5.0), 0.0);
        assert_eq!(source.amplitude_at(10.0), 0.5);
        assert_eq!(source.amplitude_at(19.9), 0.5);
        assert_eq!(source.amplitude_at(20.0), 0.0);
    }

    #[test]
    fn test_step_holds_last_amplitude() {
        let source = CurrentSource::Step {
            times: vec![5.0, 10.0],
            amplitudes: vec![0.2, 0.7],
        };
        assert_eq!(source.amplitude_at(0.0), 0.0);
        assert_eq!(source.amplitude_at(5.0), 0.2);
        assert_eq!(source.amplitude_at(9.0), 0.2);
        assert_eq!(source.amplitude_at(50.0), 0.7);
    }
}
