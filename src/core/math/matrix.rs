use crate::core::math::Real;
use crate::error::{RenderError, Result};
use nalgebra::Matrix4;
use std::fmt;

/// Dense row-major matrix with dimensions fixed at construction.
///
/// Every binary operation validates shapes and reports `RenderError::Dimension`
/// on mismatch. Determinant and inverse are closed-form cofactor expansions
/// for square sizes 1 through 5; larger sizes are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    elements: Vec<Real>,
}

/// Largest square size with a closed-form determinant/inverse.
pub const MAX_CLOSED_FORM_SIZE: usize = 5;

impl Matrix {
    /// Creates a `rows` x `columns` matrix filled with zeros.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(RenderError::Dimension(format!(
                "{rows}x{columns} must be at least 1x1"
            )));
        }
        Ok(Self {
            rows,
            columns,
            elements: vec![0.0; rows * columns],
        })
    }

    /// Creates the `n` x `n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.elements[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Builds a matrix from row-major elements.
    pub fn from_rows(rows: usize, columns: usize, elements: &[Real]) -> Result<Self> {
        let mut m = Self::zeros(rows, columns)?;
        if elements.len() != rows * columns {
            return Err(RenderError::Dimension(format!(
                "{} elements supplied for a {rows}x{columns} matrix",
                elements.len()
            )));
        }
        m.elements.copy_from_slice(elements);
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Row-major view of all elements.
    pub fn as_slice(&self) -> &[Real] {
        &self.elements
    }

    #[inline(always)]
    fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<()> {
        if row >= self.rows || column >= self.columns {
            return Err(RenderError::Index(format!(
                "element ({row}, {column}) outside {}x{}",
                self.rows, self.columns
            )));
        }
        Ok(())
    }

    pub fn get(&self, row: usize, column: usize) -> Result<Real> {
        self.check_bounds(row, column)?;
        Ok(self.elements[self.index(row, column)])
    }

    pub fn set(&mut self, row: usize, column: usize, value: Real) -> Result<()> {
        self.check_bounds(row, column)?;
        let idx = self.index(row, column);
        self.elements[idx] = value;
        Ok(())
    }

    pub fn transpose(&self) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len());
        for c in 0..self.columns {
            for r in 0..self.rows {
                elements.push(self.elements[self.index(r, c)]);
            }
        }
        Self {
            rows: self.columns,
            columns: self.rows,
            elements,
        }
    }

    fn check_same_shape(&self, other: &Self, op: &str) -> Result<()> {
        if self.rows != other.rows || self.columns != other.columns {
            return Err(RenderError::Dimension(format!(
                "{op}: {}x{} vs {}x{}",
                self.rows, self.columns, other.rows, other.columns
            )));
        }
        Ok(())
    }

    fn zip_with(&self, other: &Self, f: impl Fn(Real, Real) -> Real) -> Self {
        Self {
            rows: self.rows,
            columns: self.columns,
            elements: self
                .elements
                .iter()
                .zip(&other.elements)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    fn map(&self, f: impl Fn(Real) -> Real) -> Self {
        Self {
            rows: self.rows,
            columns: self.columns,
            elements: self.elements.iter().map(|&a| f(a)).collect(),
        }
    }

    /// Element-wise sum.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "addition")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Element-wise difference.
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "subtraction")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Matrix product `self * other`.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        if self.columns != other.rows {
            return Err(RenderError::Dimension(format!(
                "multiplication: {}x{} * {}x{}",
                self.rows, self.columns, other.rows, other.columns
            )));
        }
        let mut out = Self::zeros(self.rows, other.columns)?;
        for i in 0..self.rows {
            for j in 0..other.columns {
                let mut sum = 0.0;
                for k in 0..self.columns {
                    sum += self.elements[self.index(i, k)] * other.elements[other.index(k, j)];
                }
                let idx = out.index(i, j);
                out.elements[idx] = sum;
            }
        }
        Ok(out)
    }

    pub fn add_scalar(&self, value: Real) -> Self {
        self.map(|a| a + value)
    }

    pub fn sub_scalar(&self, value: Real) -> Self {
        self.map(|a| a - value)
    }

    pub fn mul_scalar(&self, value: Real) -> Self {
        self.map(|a| a * value)
    }

    pub fn div_scalar(&self, value: Real) -> Self {
        self.map(|a| a / value)
    }

    /// Shape-equal and every element within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: Real) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Euclidean distance between two column vectors of equal length.
    pub fn vector_distance(&self, other: &Self) -> Result<Real> {
        if self.columns != 1 || other.columns != 1 || self.rows != other.rows {
            return Err(RenderError::Dimension(format!(
                "distance needs two column vectors of equal length: {}x{} vs {}x{}",
                self.rows, self.columns, other.rows, other.columns
            )));
        }
        Ok(self
            .elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| (b - a) * (b - a))
            .sum::<Real>()
            .sqrt())
    }

    /// Sub-matrix with `row` and `column` removed.
    fn minor(&self, row: usize, column: usize) -> Self {
        let mut elements = Vec::with_capacity((self.rows - 1) * (self.columns - 1));
        for r in (0..self.rows).filter(|&r| r != row) {
            for c in (0..self.columns).filter(|&c| c != column) {
                elements.push(self.elements[self.index(r, c)]);
            }
        }
        Self {
            rows: self.rows - 1,
            columns: self.columns - 1,
            elements,
        }
    }

    fn check_closed_form(&self, op: &str) -> Result<()> {
        if !self.is_square() {
            return Err(RenderError::Dimension(format!(
                "{op} of non-square {}x{} matrix",
                self.rows, self.columns
            )));
        }
        if self.rows > MAX_CLOSED_FORM_SIZE {
            return Err(RenderError::UnsupportedConfiguration(format!(
                "{op} of {n}x{n} matrix (closed forms exist up to {m}x{m})",
                n = self.rows,
                m = MAX_CLOSED_FORM_SIZE
            )));
        }
        Ok(())
    }

    pub fn determinant(&self) -> Result<Real> {
        self.check_closed_form("determinant")?;
        Ok(self.determinant_unchecked())
    }

    fn determinant_unchecked(&self) -> Real {
        let m = &self.elements;
        match self.rows {
            1 => m[0],
            2 => det2(m),
            3 => det3(m),
            4 => {
                let (s, c) = sub_determinants4(m);
                det4_from(&s, &c)
            }
            // 5x5: first-row Laplace expansion over closed-form 4x4 minors.
            _ => (0..5)
                .map(|j| cofactor_sign(0, j) * m[j] * self.minor(0, j).determinant_unchecked())
                .sum(),
        }
    }

    pub fn inverse(&self) -> Result<Self> {
        self.check_closed_form("inverse")?;
        let det = self.determinant_unchecked();
        if det == 0.0 || !det.is_finite() {
            return Err(RenderError::DegenerateGeometry(format!(
                "singular {n}x{n} matrix (determinant {det})",
                n = self.rows
            )));
        }
        let inv_det = 1.0 / det;
        let m = &self.elements;

        let elements = match self.rows {
            1 => vec![inv_det],
            2 => vec![m[3] * inv_det, -m[1] * inv_det, -m[2] * inv_det, m[0] * inv_det],
            3 => inverse3(m, inv_det),
            4 => inverse4(m, inv_det),
            _ => {
                // Adjugate: transpose of the cofactor matrix.
                let n = self.rows;
                let mut adj = vec![0.0; n * n];
                for i in 0..n {
                    for j in 0..n {
                        adj[j * n + i] = cofactor_sign(i, j)
                            * self.minor(i, j).determinant_unchecked()
                            * inv_det;
                    }
                }
                adj
            }
        };

        Ok(Self {
            rows: self.rows,
            columns: self.columns,
            elements,
        })
    }
}

#[inline(always)]
fn cofactor_sign(row: usize, column: usize) -> Real {
    if (row + column) % 2 == 0 { 1.0 } else { -1.0 }
}

#[inline(always)]
fn det2(m: &[Real]) -> Real {
    m[0] * m[3] - m[1] * m[2]
}

#[rustfmt::skip]
fn det3(m: &[Real]) -> Real {
    m[0] * (m[4] * m[8] - m[5] * m[7])
  - m[1] * (m[3] * m[8] - m[5] * m[6])
  + m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn inverse3(m: &[Real], inv_det: Real) -> Vec<Real> {
    vec![
        (m[4] * m[8] - m[5] * m[7]) * inv_det,
        (m[2] * m[7] - m[1] * m[8]) * inv_det,
        (m[1] * m[5] - m[2] * m[4]) * inv_det,
        (m[5] * m[6] - m[3] * m[8]) * inv_det,
        (m[0] * m[8] - m[2] * m[6]) * inv_det,
        (m[2] * m[3] - m[0] * m[5]) * inv_det,
        (m[3] * m[7] - m[4] * m[6]) * inv_det,
        (m[1] * m[6] - m[0] * m[7]) * inv_det,
        (m[0] * m[4] - m[1] * m[3]) * inv_det,
    ]
}

/// 2x2 sub-determinants of the upper (`s`) and lower (`c`) row pairs of a 4x4 matrix.
#[rustfmt::skip]
fn sub_determinants4(m: &[Real]) -> ([Real; 6], [Real; 6]) {
    let s = [
        m[0] * m[5] - m[4] * m[1],
        m[0] * m[6] - m[4] * m[2],
        m[0] * m[7] - m[4] * m[3],
        m[1] * m[6] - m[5] * m[2],
        m[1] * m[7] - m[5] * m[3],
        m[2] * m[7] - m[6] * m[3],
    ];
    let c = [
        m[8]  * m[13] - m[12] * m[9],
        m[8]  * m[14] - m[12] * m[10],
        m[8]  * m[15] - m[12] * m[11],
        m[9]  * m[14] - m[13] * m[10],
        m[9]  * m[15] - m[13] * m[11],
        m[10] * m[15] - m[14] * m[11],
    ];
    (s, c)
}

#[inline(always)]
fn det4_from(s: &[Real; 6], c: &[Real; 6]) -> Real {
    s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
}

#[rustfmt::skip]
fn inverse4(m: &[Real], inv_det: Real) -> Vec<Real> {
    let (s, c) = sub_determinants4(m);
    vec![
        ( m[5]  * c[5] - m[6]  * c[4] + m[7]  * c[3]) * inv_det,
        (-m[1]  * c[5] + m[2]  * c[4] - m[3]  * c[3]) * inv_det,
        ( m[13] * s[5] - m[14] * s[4] + m[15] * s[3]) * inv_det,
        (-m[9]  * s[5] + m[10] * s[4] - m[11] * s[3]) * inv_det,

        (-m[4]  * c[5] + m[6]  * c[2] - m[7]  * c[1]) * inv_det,
        ( m[0]  * c[5] - m[2]  * c[2] + m[3]  * c[1]) * inv_det,
        (-m[12] * s[5] + m[14] * s[2] - m[15] * s[1]) * inv_det,
        ( m[8]  * s[5] - m[10] * s[2] + m[11] * s[1]) * inv_det,

        ( m[4]  * c[4] - m[5]  * c[2] + m[7]  * c[0]) * inv_det,
        (-m[0]  * c[4] + m[1]  * c[2] - m[3]  * c[0]) * inv_det,
        ( m[12] * s[4] - m[13] * s[2] + m[15] * s[0]) * inv_det,
        (-m[8]  * s[4] + m[9]  * s[2] - m[11] * s[0]) * inv_det,

        (-m[4]  * c[3] + m[5]  * c[1] - m[6]  * c[0]) * inv_det,
        ( m[0]  * c[3] - m[1]  * c[1] + m[2]  * c[0]) * inv_det,
        (-m[12] * s[3] + m[13] * s[1] - m[14] * s[0]) * inv_det,
        ( m[8]  * s[3] - m[9]  * s[1] + m[10] * s[0]) * inv_det,
    ]
}

impl From<&Matrix4<Real>> for Matrix {
    fn from(m: &Matrix4<Real>) -> Self {
        let mut elements = Vec::with_capacity(16);
        for r in 0..4 {
            for c in 0..4 {
                elements.push(m[(r, c)]);
            }
        }
        Self {
            rows: 4,
            columns: 4,
            elements,
        }
    }
}

impl TryFrom<&Matrix> for Matrix4<Real> {
    type Error = RenderError;

    fn try_from(m: &Matrix) -> Result<Self> {
        if m.rows != 4 || m.columns != 4 {
            return Err(RenderError::Dimension(format!(
                "expected 4x4, got {}x{}",
                m.rows, m.columns
            )));
        }
        Ok(Matrix4::from_row_slice(&m.elements))
    }
}

/// Inverts a 4x4 transform through the closed-form kernel.
pub fn invert4(m: &Matrix4<Real>) -> Result<Matrix4<Real>> {
    let inverse = Matrix::from(m).inverse()?;
    Matrix4::try_from(&inverse)
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for r in 0..self.rows {
            write!(f, "{{")?;
            for c in 0..self.columns {
                if c > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", self.elements[self.index(r, c)])?;
            }
            write!(f, "}}")?;
            if r + 1 < self.rows {
                write!(f, ",")?;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn m3(elements: [Real; 9]) -> Matrix {
        Matrix::from_rows(3, 3, &elements).unwrap()
    }

    fn random_matrix(rng: &mut StdRng, n: usize) -> Matrix {
        let elements: Vec<Real> = (0..n * n).map(|_| rng.random_range(-5.0..5.0)).collect();
        Matrix::from_rows(n, n, &elements).unwrap()
    }

    #[test]
    fn zero_matrix_matches_explicit_zeros() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::from_rows(2, 3, &[0.0; 6]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_sized_matrix_is_a_dimension_error() {
        assert!(matches!(Matrix::zeros(0, 3), Err(RenderError::Dimension(_))));
        assert!(matches!(Matrix::identity(0), Err(RenderError::Dimension(_))));
    }

    #[test]
    fn from_rows_rejects_wrong_element_count() {
        assert!(matches!(
            Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0]),
            Err(RenderError::Dimension(_))
        ));
    }

    #[test]
    fn identity_has_ones_on_diagonal() {
        let id = Matrix::identity(3).unwrap();
        assert_eq!(id, m3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut a = Matrix::zeros(2, 2).unwrap();
        a.set(1, 0, 7.5).unwrap();
        assert_eq!(a.get(1, 0).unwrap(), 7.5);
        assert!(matches!(a.get(2, 0), Err(RenderError::Index(_))));
        assert!(matches!(a.set(0, 2, 1.0), Err(RenderError::Index(_))));
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let expected = Matrix::from_rows(3, 2, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
        assert_eq!(a.transpose(), expected);
    }

    #[test]
    fn addition_and_subtraction() {
        let id = Matrix::identity(3).unwrap();
        let b = m3([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(
            id.try_add(&b).unwrap(),
            m3([2.0, 2.0, 3.0, 4.0, 6.0, 6.0, 7.0, 8.0, 10.0])
        );
        assert_eq!(
            id.try_sub(&b).unwrap(),
            m3([0.0, -2.0, -3.0, -4.0, -4.0, -6.0, -7.0, -8.0, -8.0])
        );
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 3).unwrap();
        assert!(matches!(a.try_add(&b), Err(RenderError::Dimension(_))));
        assert!(matches!(a.try_sub(&b), Err(RenderError::Dimension(_))));
        assert!(matches!(b.try_mul(&a), Err(RenderError::Dimension(_))));
        assert!(a.try_mul(&b).is_ok());
    }

    #[test]
    fn identity_product_is_exact() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 1..=5 {
            let m = random_matrix(&mut rng, n);
            let id = Matrix::identity(n).unwrap();
            assert_eq!(id.try_mul(&m).unwrap(), m);
            assert_eq!(m.try_mul(&id).unwrap(), m);
        }
    }

    #[test]
    fn scalar_operations() {
        let id = Matrix::identity(3).unwrap();
        assert_eq!(
            id.add_scalar(1.0),
            m3([2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0])
        );
        assert_eq!(
            id.sub_scalar(1.0),
            m3([0.0, -1.0, -1.0, -1.0, 0.0, -1.0, -1.0, -1.0, 0.0])
        );
        assert_eq!(
            id.mul_scalar(10.0),
            m3([10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0])
        );
        assert_eq!(
            id.div_scalar(2.0),
            m3([0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.5])
        );
    }

    #[test]
    fn determinants_of_known_matrices() {
        assert_eq!(Matrix::from_rows(1, 1, &[-4.0]).unwrap().determinant().unwrap(), -4.0);
        let a2 = Matrix::from_rows(2, 2, &[3.0, 8.0, 4.0, 6.0]).unwrap();
        assert_relative_eq!(a2.determinant().unwrap(), -14.0);
        let a3 = m3([6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0]);
        assert_relative_eq!(a3.determinant().unwrap(), -306.0);
        #[rustfmt::skip]
        let a4 = Matrix::from_rows(4, 4, &[
            1.0, 0.0, 2.0, -1.0,
            3.0, 0.0, 0.0, 5.0,
            2.0, 1.0, 4.0, -3.0,
            1.0, 0.0, 5.0, 0.0,
        ]).unwrap();
        assert_relative_eq!(a4.determinant().unwrap(), 30.0, epsilon = 1e-9);
        #[rustfmt::skip]
        let a5 = Matrix::from_rows(5, 5, &[
            2.0, 1.0, 3.0, 0.0, 4.0,
            0.0, 3.0, 1.0, 2.0, 1.0,
            0.0, 0.0, 4.0, 1.0, 2.0,
            0.0, 0.0, 0.0, 5.0, 3.0,
            0.0, 0.0, 0.0, 0.0, 6.0,
        ]).unwrap();
        assert_relative_eq!(a5.determinant().unwrap(), 720.0, epsilon = 1e-9);
        // Swapping two rows flips the sign.
        let swapped = Matrix::from_rows(5, 5, &{
            let mut e = a5.as_slice().to_vec();
            for c in 0..5 {
                e.swap(c, 5 + c);
            }
            e
        })
        .unwrap();
        assert_relative_eq!(swapped.determinant().unwrap(), -720.0, epsilon = 1e-9);
    }

    #[test]
    fn random_inverses_recover_identity() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..=5 {
            let id = Matrix::identity(n).unwrap();
            let mut checked = 0;
            while checked < 20 {
                let a = random_matrix(&mut rng, n);
                if a.determinant().unwrap().abs() < 1e-3 {
                    continue;
                }
                let product = a.inverse().unwrap().try_mul(&a).unwrap();
                assert!(product.approx_eq(&id, 1e-2), "n={n}: {product}");
                checked += 1;
            }
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let a = m3([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(matches!(a.inverse(), Err(RenderError::DegenerateGeometry(_))));
    }

    #[test]
    fn unsupported_sizes_fail_loudly() {
        let big = Matrix::identity(6).unwrap();
        assert!(matches!(
            big.determinant(),
            Err(RenderError::UnsupportedConfiguration(_))
        ));
        assert!(matches!(
            big.inverse(),
            Err(RenderError::UnsupportedConfiguration(_))
        ));
        let rect = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(rect.determinant(), Err(RenderError::Dimension(_))));
    }

    #[test]
    fn converts_to_and_from_matrix4() {
        let m4 = Matrix4::new(
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        );
        let m = Matrix::from(&m4);
        assert_eq!(m.get(0, 3).unwrap(), 4.0);
        assert_eq!(m.get(3, 0).unwrap(), 13.0);
        assert_eq!(Matrix4::try_from(&m).unwrap(), m4);
        assert!(Matrix4::try_from(&Matrix::identity(3).unwrap()).is_err());
    }

    #[test]
    fn vector_distance_between_columns() {
        let a = Matrix::from_rows(3, 1, &[70.0, 90.0, 10.0]).unwrap();
        let b = Matrix::from_rows(3, 1, &[41.0, 6.0, 48.0]).unwrap();
        assert_relative_eq!(a.vector_distance(&b).unwrap(), 96.6488, epsilon = 1e-3);
        assert!(a.vector_distance(&Matrix::zeros(2, 1).unwrap()).is_err());
    }

    #[test]
    fn display_uses_nested_braces() {
        let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(a.to_string(), "{{1,2},{3,4}}");
    }
}
