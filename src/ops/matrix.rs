//! Matrix operations over column-major inputs, expressed element-wise in
//! terms of the scalar primitives. Internal block arithmetic works on raw
//! column vectors so Schur-complement blocks may be 1x1; only the public
//! surface enforces the 2..=4 dimension range.

use crate::interval::{FpInterval, FpMatrix, FpVector};
use crate::kind::FpKind;

use super::vector::lift;
use super::{sum_all_orders, OpError};

/// Column-major interval matrix with unrestricted dimensions, used for
/// block decomposition.
type Cols = Vec<Vec<FpInterval>>;

fn ncols(m: &Cols) -> usize {
    m.len()
}

fn nrows(m: &Cols) -> usize {
    m[0].len()
}

fn lift_matrix(kind: FpKind, m: &[Vec<f64>]) -> Cols {
    m.iter().map(|c| lift(kind, c)).collect()
}

fn assert_matrix_dims(m: &[Vec<f64>]) {
    assert!(
        (2..=4).contains(&m.len()),
        "matrix has {} columns, outside 2..=4",
        m.len()
    );
    let rows = m[0].len();
    assert!(
        (2..=4).contains(&rows),
        "matrix has {rows} rows, outside 2..=4"
    );
    assert!(m.iter().all(|c| c.len() == rows), "matrix has ragged columns");
}

fn assert_square(m: &[Vec<f64>]) {
    assert_matrix_dims(m);
    assert!(
        m.len() == m[0].len(),
        "matrix is {}x{}, expected square",
        m.len(),
        m[0].len()
    );
}

impl FpKind {
    /// Product `a * b` of interval matrices; `a` is (r x m), `b` (m x c).
    fn mat_mul_inner(self, a: &Cols, b: &Cols) -> Cols {
        assert!(
            ncols(a) == nrows(b),
            "matrix product dimension mismatch: {}x{} * {}x{}",
            nrows(a),
            ncols(a),
            nrows(b),
            ncols(b)
        );
        (0..ncols(b))
            .map(|j| {
                (0..nrows(a))
                    .map(|i| {
                        let terms: Vec<FpInterval> = (0..ncols(a))
                            .map(|k| self.multiplication_inner(&a[k][i], &b[j][k]))
                            .collect();
                        sum_all_orders(self, &terms)
                    })
                    .collect()
            })
            .collect()
    }

    fn mat_sub_inner(self, a: &Cols, b: &Cols) -> Cols {
        a.iter()
            .zip(b)
            .map(|(ca, cb)| {
                ca.iter()
                    .zip(cb)
                    .map(|(x, y)| self.subtraction_inner(x, y))
                    .collect()
            })
            .collect()
    }

    fn mat_scale_inner(self, m: &Cols, s: &FpInterval) -> Cols {
        m.iter()
            .map(|c| c.iter().map(|e| self.multiplication_inner(e, s)).collect())
            .collect()
    }

    /// Cofactor expansion along the first column, spanning every addition
    /// order of the cofactor terms.
    fn det_inner(self, m: &Cols) -> FpInterval {
        let n = ncols(m);
        if n == 1 {
            return m[0][0];
        }
        let mut terms = Vec::with_capacity(n);
        for i in 0..n {
            let minor: Cols = m[1..]
                .iter()
                .map(|c| {
                    c.iter()
                        .enumerate()
                        .filter(|(r, _)| *r != i)
                        .map(|(_, e)| *e)
                        .collect()
                })
                .collect();
            let term = self.multiplication_inner(&m[0][i], &self.det_inner(&minor));
            terms.push(if i % 2 == 0 {
                term
            } else {
                self.negation_inner(&term)
            });
        }
        sum_all_orders(self, &terms)
    }

    /// Block inverse via Schur complement on the leading 1x1 pivot.
    /// A leading element whose interval touches zero degrades to "any"
    /// through the division machinery.
    fn inverse_inner(self, m: &Cols) -> Cols {
        let n = ncols(m);
        let one = FpInterval::point(self, 1.0);
        if n == 1 {
            return vec![vec![self.division_inner(&one, &m[0][0])]];
        }
        if n == 2 {
            // Adjugate over determinant
            let det = self.det_inner(m);
            let div = |e: &FpInterval| self.division_inner(e, &det);
            let neg_div = |e: &FpInterval| self.division_inner(&self.negation_inner(e), &det);
            return vec![
                vec![div(&m[1][1]), neg_div(&m[0][1])],
                vec![neg_div(&m[1][0]), div(&m[0][0])],
            ];
        }

        // M = [[a, B], [C, D]] with a the 1x1 pivot
        let a = m[0][0];
        let b_blk: Cols = m[1..].iter().map(|c| vec![c[0]]).collect();
        let c_blk: Cols = vec![m[0][1..].to_vec()];
        let d_blk: Cols = m[1..].iter().map(|c| c[1..].to_vec()).collect();

        let a_inv = self.division_inner(&one, &a);
        // S = D - C * a^-1 * B
        let c_scaled = self.mat_scale_inner(&c_blk, &a_inv);
        let s = self.mat_sub_inner(&d_blk, &self.mat_mul_inner(&c_scaled, &b_blk));
        let s_inv = self.inverse_inner(&s);

        // Top-left: a^-1 + a^-1 (B S^-1 C) a^-1
        let b_sinv = self.mat_mul_inner(&b_blk, &s_inv);
        let bsc = self.mat_mul_inner(&b_sinv, &c_blk)[0][0];
        let a_inv_sq = self.multiplication_inner(&a_inv, &a_inv);
        let top_left = self.addition_inner(&a_inv, &self.multiplication_inner(&a_inv_sq, &bsc));

        // Top-right: -a^-1 (B S^-1); bottom-left: -(S^-1 C) a^-1
        let top_right: Vec<FpInterval> = b_sinv
            .iter()
            .map(|c| self.negation_inner(&self.multiplication_inner(&a_inv, &c[0])))
            .collect();
        let sinv_c = self.mat_mul_inner(&s_inv, &c_blk);
        let bottom_left: Vec<FpInterval> = sinv_c[0]
            .iter()
            .map(|e| self.negation_inner(&self.multiplication_inner(e, &a_inv)))
            .collect();

        let mut out: Cols = Vec::with_capacity(n);
        let mut col0 = vec![top_left];
        col0.extend(bottom_left);
        out.push(col0);
        for j in 0..n - 1 {
            let mut col = vec![top_right[j]];
            col.extend(s_inv[j].iter().copied());
            out.push(col);
        }
        out
    }

    /// Acceptance intervals for `transpose(m)`.
    pub fn transpose_interval(self, m: &[Vec<f64>]) -> Result<FpMatrix, OpError> {
        assert_matrix_dims(m);
        let rows = m[0].len();
        Ok(FpMatrix::new(
            (0..rows)
                .map(|i| {
                    m.iter()
                        .map(|c| self.correctly_rounded_interval(c[i]))
                        .collect()
                })
                .collect(),
        ))
    }

    /// Acceptance intervals for element-wise `a + b`.
    pub fn matrix_addition_interval(
        self,
        a: &[Vec<f64>],
        b: &[Vec<f64>],
    ) -> Result<FpMatrix, OpError> {
        assert_matrix_dims(a);
        assert_matrix_dims(b);
        assert!(
            a.len() == b.len() && a[0].len() == b[0].len(),
            "matrix addition dimension mismatch"
        );
        let (a, b) = (lift_matrix(self, a), lift_matrix(self, b));
        Ok(FpMatrix::new(
            a.iter()
                .zip(&b)
                .map(|(ca, cb)| {
                    ca.iter()
                        .zip(cb)
                        .map(|(x, y)| self.addition_inner(x, y))
                        .collect()
                })
                .collect(),
        ))
    }

    /// Acceptance intervals for element-wise `a - b`.
    pub fn matrix_subtraction_interval(
        self,
        a: &[Vec<f64>],
        b: &[Vec<f64>],
    ) -> Result<FpMatrix, OpError> {
        assert_matrix_dims(a);
        assert_matrix_dims(b);
        assert!(
            a.len() == b.len() && a[0].len() == b[0].len(),
            "matrix subtraction dimension mismatch"
        );
        let (a, b) = (lift_matrix(self, a), lift_matrix(self, b));
        Ok(FpMatrix::new(self.mat_sub_inner(&a, &b)))
    }

    /// Acceptance intervals for element-wise `-m`.
    pub fn matrix_negation_interval(self, m: &[Vec<f64>]) -> Result<FpMatrix, OpError> {
        assert_matrix_dims(m);
        Ok(FpMatrix::new(
            lift_matrix(self, m)
                .iter()
                .map(|c| c.iter().map(|e| self.negation_inner(e)).collect())
                .collect(),
        ))
    }

    /// Acceptance intervals for element-wise `m * s`.
    pub fn matrix_scalar_multiplication_interval(
        self,
        m: &[Vec<f64>],
        s: f64,
    ) -> Result<FpMatrix, OpError> {
        assert_matrix_dims(m);
        let sv = FpInterval::new(self, s, s);
        Ok(FpMatrix::new(
            self.mat_scale_inner(&lift_matrix(self, m), &sv),
        ))
    }

    /// Acceptance intervals for element-wise `s * m`.
    pub fn scalar_matrix_multiplication_interval(
        self,
        s: f64,
        m: &[Vec<f64>],
    ) -> Result<FpMatrix, OpError> {
        self.matrix_scalar_multiplication_interval(m, s)
    }

    /// Acceptance intervals for the matrix product `a * b`.
    pub fn matrix_multiplication_interval(
        self,
        a: &[Vec<f64>],
        b: &[Vec<f64>],
    ) -> Result<FpMatrix, OpError> {
        assert_matrix_dims(a);
        assert_matrix_dims(b);
        let (a, b) = (lift_matrix(self, a), lift_matrix(self, b));
        Ok(FpMatrix::new(self.mat_mul_inner(&a, &b)))
    }

    /// Acceptance intervals for the matrix-vector product `m * v`.
    pub fn matrix_vector_multiplication_interval(
        self,
        m: &[Vec<f64>],
        v: &[f64],
    ) -> Result<FpVector, OpError> {
        assert_matrix_dims(m);
        assert!(
            m.len() == v.len(),
            "matrix-vector product dimension mismatch: {} columns vs {} components",
            m.len(),
            v.len()
        );
        let mc = lift_matrix(self, m);
        let vc = vec![lift(self, v)];
        Ok(FpVector::new(
            self.mat_mul_inner(&mc, &vc).remove(0),
        ))
    }

    /// Acceptance intervals for the vector-matrix product `v * m`.
    pub fn vector_matrix_multiplication_interval(
        self,
        v: &[f64],
        m: &[Vec<f64>],
    ) -> Result<FpVector, OpError> {
        assert_matrix_dims(m);
        assert!(
            m[0].len() == v.len(),
            "vector-matrix product dimension mismatch: {} components vs {} rows",
            v.len(),
            m[0].len()
        );
        let vs = lift(self, v);
        let mc = lift_matrix(self, m);
        Ok(FpVector::new(
            mc.iter().map(|col| self.dot_inner(&vs, col)).collect(),
        ))
    }

    /// Acceptance interval for `determinant(m)` of a square 2x2 to 4x4
    /// matrix, via cofactor expansion with every addition order spanned.
    ///
    /// The cofactor expansion is only guaranteed accurate for matrices of
    /// integer elements with `|e|^4 < 2^21`; it is not a general
    /// accuracy-safe determinant.
    ///
    /// ```
    /// use fpbounds::FpKind;
    ///
    /// let eye = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    /// let det = FpKind::F32.determinant_interval(&eye).unwrap();
    /// assert!(det.contains_value(1.0));
    /// ```
    pub fn determinant_interval(self, m: &[Vec<f64>]) -> Result<FpInterval, OpError> {
        assert_square(m);
        Ok(self.det_inner(&lift_matrix(self, m)))
    }

    /// Acceptance intervals for `inverse(m)` of a square 2x2 to 4x4
    /// matrix: adjugate over determinant at 2x2, Schur-complement block
    /// decomposition above. Shares the determinant's integer-element
    /// accuracy limitation, and a leading pivot interval touching zero
    /// yields "any" intervals rather than a tight bound.
    pub fn inverse_interval(self, m: &[Vec<f64>]) -> Result<FpMatrix, OpError> {
        assert_square(m);
        Ok(FpMatrix::new(self.inverse_inner(&lift_matrix(self, m))))
    }
}
