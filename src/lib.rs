/*!
Convex quadratic programs solved by conic solvers.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate for Rust reduces a **convex QP** to a **second-order cone program** (SOCP)
and dispatches it to a conic solver, [`totsu_core`] or [`clarabel`].

# General usage

1. Express your problem as a [`ProbQP`]: \\(P, q\\) and any of \\(G x \preceq h\\),
   \\(A x = b\\) and \\(lb \preceq x \preceq ub\\).
   Matrices are [`CscMat`] over [`clarabel::algebra::CscMatrix`], which can also be built densely with [`MatBuild`].
1. Create a [`Registry`] of backends and optionally set their options by
   [`Registry::set_option`] or environment variables (see [`totsu_par_by_env`], [`clarabel_par_by_env`]).
1. Invoke [`Registry::solve`] with a backend name to get a [`SolveReport`].

Backends:
* `totsu` - first-order conic solver of [`totsu_core`], pure Rust, moderate accuracy.
* `clarabel` - interior-point solver of [`clarabel`] on the same cone program.
* `clarabel_qp` - [`clarabel`] given \\(P\\) directly, as a reference of the reduction.

The reduction itself is available as [`ProbQP::to_socp`], built upon
[`linear_from_box_inequalities`] and [`socp_from_qp`].

# Examples

A simple QP problem:
\\[
\begin{array}{ll}
{\rm minimize} & {(x_0 - (-1))^2 + (x_1 - (-2))^2 \over 2} \\\\
{\rm subject \ to} & 1 - {x_0 \over 2} - {x_1 \over 3} <= 0
\end{array}
\\]

You will notice that a perpendicular drawn from \\((-1, -2)\\)
to the line \\(1 - {x_0 \over 2} - {x_1 \over 3} = 0\\) intersects
at point \\((2, 0)\\) which is the optimal solution of the problem.

```
use float_eq::assert_float_eq;
use qpsocp::prelude::*;
use qpsocp::*;

//env_logger::init(); // Use any logger crate as `qpsocp` uses `log` crate.

let n = 2; // x0, x1
let m = 1;

// (1/2)(x - a)^2 + const
let mut sym_p = MatBuild::new(MatType::SymPack(n));
sym_p[(0, 0)] = 1.;
sym_p[(1, 1)] = 1.;

let vec_q = vec![
    -(-1.), // -a0
    -(-2.), // -a1
];

// 1 - x0/b0 - x1/b1 <= 0
let mut mat_g = MatBuild::new(MatType::General(m, n));
mat_g[(0, 0)] = -1. / 2.; // -1/b0
mat_g[(0, 1)] = -1. / 3.; // -1/b1

let vec_h = vec![-1.];

let qp = ProbQP::new(sym_p, vec_q).with_ineq(mat_g, vec_h);

let reg = Registry::with_defaults();

let rslt = reg.solve("clarabel", &qp, &SolveOptions::default()).unwrap();
assert_float_eq!(rslt.solution.x().unwrap(), [2., 0.].as_ref(), abs_all <= 1e-5);

let rslt = reg.solve("totsu", &qp, &SolveOptions::default()).unwrap();
assert_float_eq!(rslt.solution.x().unwrap(), [2., 0.].as_ref(), abs_all <= 1e-3);
```
*/

mod error;

pub use error::*;

//

mod cscmat;
mod matbuild;
mod psdfactor;

pub use cscmat::*;
pub use matbuild::*;
pub use psdfactor::*;

//

mod problem;

pub use problem::*;

//

mod report;
mod backend;

pub use report::*;
pub use backend::*;

//

mod utils;

pub use utils::*;

//

/// Prelude
pub mod prelude
{
   pub use totsu_core::solver::{SolverError, SolverParam};
   pub use totsu_core::{FloatGeneric, MatType};
   pub use crate::{ProbQP, CscMat, MatBuild, Registry, QpBackend, SolveOptions, Solution, QpError};
}
