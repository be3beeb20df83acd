//! Transfer-operator extraction
//!
//! Composes every passive operation of an unrolled circuit into one
//! linear map over the computational registers. Each two-register
//! interaction is the 2x2 block `B(theta) * diag(e^{i alpha}, 1)`
//! embedded into the identity over all registers; losses scale a single
//! row by the amplitude transmission. Operators are applied in
//! chronological order, each premultiplying the running product.

use num_complex::Complex64;
use tdmc_core::{TdmcError, TdmcResult};

use crate::operation::{UnrolledCircuit, UnrolledOp};

/// Composed passive action on the `M` computational registers
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOperator {
    dim: usize,
    /// Row-major `dim x dim` entries
    rows: Vec<Vec<Complex64>>,
}

impl TransferOperator {
    /// Extract the transfer operator of a passive circuit
    ///
    /// Fails on the first squeezing operation; strip them with
    /// [`UnrolledCircuit::strip_active`] first.
    pub fn extract(circuit: &UnrolledCircuit) -> TdmcResult<Self> {
        let n = circuit.num_registers();
        let mut full: Vec<Vec<Complex64>> = (0..n)
            .map(|r| {
                let mut row = vec![Complex64::new(0.0, 0.0); n];
                row[r] = Complex64::new(1.0, 0.0);
                row
            })
            .collect();

        for op in circuit.ops() {
            match op {
                UnrolledOp::Squeeze { bin, .. } => {
                    return Err(TdmcError::NonPassiveOperation { bin: *bin });
                }
                UnrolledOp::Couple {
                    inside,
                    incoming,
                    rotation,
                    beamsplitter,
                    ..
                } => {
                    let phase = Complex64::from_polar(1.0, *rotation);
                    let (sin, cos) = beamsplitter.sin_cos();

                    let a = inside.index();
                    let b = incoming.index();
                    let row_a = full[a].clone();
                    let row_b = full[b].clone();
                    for c in 0..n {
                        full[a][c] = cos * phase * row_a[c] - sin * row_b[c];
                        full[b][c] = sin * phase * row_a[c] + cos * row_b[c];
                    }
                }
                UnrolledOp::Loss {
                    register,
                    efficiency,
                    ..
                } => {
                    let amp = efficiency.amplitude();
                    for entry in &mut full[register.index()] {
                        *entry *= amp;
                    }
                }
                UnrolledOp::Measure { .. } => {}
            }
        }

        // Restrict to computational rows (cropped measurements, in
        // detection order) and columns (computational inputs).
        let outputs = circuit.cropped_measurements();
        let inputs = circuit.computational_inputs();
        let rows = outputs
            .iter()
            .map(|m| {
                inputs
                    .iter()
                    .map(|input| full[m.register.index()][input.index()])
                    .collect()
            })
            .collect();

        Ok(Self {
            dim: circuit.modes(),
            rows,
        })
    }

    /// Matrix dimension `M`
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at (output `row`, input `col`)
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.rows[row][col]
    }

    /// Row-major matrix entries
    pub fn rows(&self) -> &[Vec<Complex64>] {
        &self.rows
    }

    /// Squared column norm, the total transmitted intensity of input `col`
    pub fn column_intensity(&self, col: usize) -> f64 {
        self.rows.iter().map(|row| row[col].norm_sqr()).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
