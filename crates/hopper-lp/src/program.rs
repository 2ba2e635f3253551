// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Request types submitted to the solving engines.

/// A sparse coefficient: `(variable or row position, value)`.
pub type Entry = (usize, f64);

/// A continuous variable of a `LinearProgram`, stored column-wise.
#[derive(Clone, Debug, PartialEq)]
pub struct LpColumn {
    cost: f64,
    upper_bound: f64,
    entries: Vec<Entry>,
}

impl LpColumn {
    /// The objective coefficient.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The upper bound; `f64::INFINITY` when unbounded.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Row coefficients as `(row, value)`.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// A minimisation LP over nonnegative variables with equality rows.
///
/// ```text
/// min  sum_j cost_j * x_j
/// s.t. sum_j a_ij * x_j  = rhs_i     for every row i
///      0 <= x_j <= upper_bound_j
/// ```
///
/// The program grows by columns; rows are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    rhs: Vec<f64>,
    columns: Vec<LpColumn>,
}

impl LinearProgram {
    /// Creates a program with the given right-hand sides and no columns.
    pub fn new(rhs: Vec<f64>) -> Self {
        Self {
            rhs,
            columns: Vec::new(),
        }
    }

    /// Appends a column and returns its position.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if an entry references a row that does not
    /// exist.
    pub fn add_column(&mut self, cost: f64, upper_bound: f64, entries: Vec<Entry>) -> usize {
        debug_assert!(
            entries.iter().all(|&(row, _)| row < self.rhs.len()),
            "called `LinearProgram::add_column` with a row out of bounds: the number of rows is {}",
            self.rhs.len()
        );
        self.columns.push(LpColumn {
            cost,
            upper_bound,
            entries,
        });
        self.columns.len() - 1
    }

    /// Overrides the upper bound of a column.
    #[inline]
    pub fn set_upper_bound(&mut self, column: usize, upper_bound: f64) {
        self.columns[column].upper_bound = upper_bound;
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rhs.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    #[inline]
    pub fn columns(&self) -> &[LpColumn] {
        &self.columns
    }

    /// Evaluates the objective at `values`.
    pub fn objective_at(&self, values: &[f64]) -> f64 {
        self.columns
            .iter()
            .zip(values)
            .map(|(c, &v)| c.cost * v)
            .sum()
    }

    /// Transposes the column-wise storage into row-wise term lists.
    pub fn row_terms(&self) -> Vec<Vec<Entry>> {
        let mut rows = vec![Vec::new(); self.rhs.len()];
        for (j, column) in self.columns.iter().enumerate() {
            for &(row, value) in &column.entries {
                rows[row].push((j, value));
            }
        }
        rows
    }
}

/// The sense of a `BinaryProgram` row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowSense {
    LessOrEqual,
    Equal,
}

impl std::fmt::Display for RowSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LessOrEqual => write!(f, "<="),
            Self::Equal => write!(f, "="),
        }
    }
}

/// A linear row of a `BinaryProgram`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryRow {
    pub terms: Vec<Entry>,
    pub sense: RowSense,
    pub rhs: f64,
}

/// A minimisation program over binary variables.
///
/// ```text
/// min  constant + sum_j c_j * x_j
/// s.t. rows (<= or =)
///      x_j in {0, 1}
/// ```
///
/// Rows are meant to stay fixed while the objective is replaced between
/// solves.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryProgram {
    num_variables: usize,
    rows: Vec<BinaryRow>,
    constant: f64,
    objective: Vec<f64>,
    threads: usize,
}

impl BinaryProgram {
    /// Creates a program with `num_variables` binaries, no rows, a zero
    /// objective and a single-thread hint.
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            rows: Vec::new(),
            constant: 0.0,
            objective: vec![0.0; num_variables],
            threads: 1,
        }
    }

    /// Adds a `terms <= rhs` row.
    pub fn add_less_or_equal(&mut self, terms: Vec<Entry>, rhs: f64) {
        self.push_row(terms, RowSense::LessOrEqual, rhs);
    }

    /// Adds a `terms = rhs` row.
    pub fn add_equal(&mut self, terms: Vec<Entry>, rhs: f64) {
        self.push_row(terms, RowSense::Equal, rhs);
    }

    fn push_row(&mut self, terms: Vec<Entry>, sense: RowSense, rhs: f64) {
        debug_assert!(
            terms.iter().all(|&(var, _)| var < self.num_variables),
            "called `BinaryProgram::push_row` with a variable out of bounds: the number of variables is {}",
            self.num_variables
        );
        self.rows.push(BinaryRow { terms, sense, rhs });
    }

    /// Replaces the objective.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` does not hold one value per variable.
    pub fn set_objective(&mut self, constant: f64, coefficients: &[f64]) {
        assert_eq!(
            coefficients.len(),
            self.num_variables,
            "objective length must match the number of variables"
        );
        self.constant = constant;
        self.objective.clear();
        self.objective.extend_from_slice(coefficients);
    }

    /// Sets the execution-thread hint passed to the engine.
    #[inline]
    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads.max(1);
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    #[inline]
    pub fn rows(&self) -> &[BinaryRow] {
        &self.rows
    }

    #[inline]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    #[inline]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Evaluates the objective at `values`.
    pub fn objective_at(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .objective
                .iter()
                .zip(values)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}
