//! Small dense-matrix utilities used by the decompositions and their tests

pub mod dense;
pub mod norms;
pub mod pivoting;
pub mod validation;

pub use dense::{conj_transpose, from_rows, identity, matmul, set_identity, tabulate, zeros};
pub use norms::{column_norm2, element_max_abs, norm_2, norm_frobenius};
pub use pivoting::{apply_column_permutation, column_pivot_matrix, invert_permutation};
pub use validation::{is_unitary, is_upper_triangular, reconstruction_error};
