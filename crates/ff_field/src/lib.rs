// crates/ff_field/src/lib.rs

//! foamfield 场层
//!
//! 标量、矢量与张量的稠密场，算术运算复用临时量的存储；
//! 另含有量纲物理量与几何场。
//!
//! # 模块概览
//!
//! - [`primitives`]: `Vector`、`Tensor`、`SymmTensor` 元素类型
//! - [`value`]: 元素类型上的密封 trait `FieldValue`
//! - [`field`]: `Field<T>`，独占的稠密容器
//! - [`tmp`]: `Tmp<C>`，运算符产生的只可移动结果
//! - [`kernel`]: 操作数分发与逐元素内核
//! - [`ops`]: 场的 `std::ops` 实现
//! - [`expr`]: 返回 `FieldResult` 的相同运算
//! - [`interop`]: ndarray 视图与导入
//! - [`dimensioned`]: 带量纲的命名值
//! - [`geometric`]: 带边界面片的有量纲场
//! - [`functions`]: 归约与 `mag`
//!
//! # 设计原则
//!
//! 1. **所有权决定复用**: 借用的操作数不会被写入，
//!    有所有权的操作数（按值传入的 `Field` 或 `Tmp`）将存储交给结果
//! 2. **先检查后写入**: 长度、量纲与布局在产生任何输出元素之前验证
//! 3. **运行时量纲**: 量纲集是值，可来自配置文件
//!
//! # 示例
//!
//! ```
//! use ff_field::prelude::*;
//!
//! let a = Field::from(vec![1.0, 2.0, 3.0]);
//! let b = Field::from(vec![2.0, 3.0, 4.0]);
//! let c = Field::from(vec![3.0, 4.0, 5.0]);
//!
//! let r = &c - &a * &b;
//! assert_eq!(r.as_slice(), &[1.0, -2.0, -7.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dimensioned;
pub mod expr;
pub mod field;
pub mod functions;
pub mod geometric;
pub mod interop;
pub mod kernel;
pub mod ops;
pub mod primitives;
pub mod tmp;
pub mod value;

pub use dimensioned::{
    Dimensioned, DimensionedScalar, DimensionedSymmTensor, DimensionedTensor, DimensionedVector,
};
pub use field::{Field, ScalarField, SymmTensorField, TensorField, VectorField};
pub use geometric::{
    GeometricField, PatchField, VolScalarField, VolSymmTensorField, VolTensorField,
    VolVectorField, INTERNAL_FIELD,
};
pub use primitives::{SymmTensor, Tensor, Vector};
pub use tmp::{Tmp, TmpField};
pub use value::{FieldValue, Scalar};

/// 常用导出
pub mod prelude {
    pub use crate::dimensioned::{
        Dimensioned, DimensionedScalar, DimensionedSymmTensor, DimensionedTensor,
        DimensionedVector,
    };
    pub use crate::field::{Field, ScalarField, SymmTensorField, TensorField, VectorField};
    pub use crate::functions::{average, mag, mag_sqr, sum, Magnitude};
    pub use crate::geometric::{
        GeometricField, PatchField, VolScalarField, VolSymmTensorField, VolTensorField,
        VolVectorField, INTERNAL_FIELD,
    };
    pub use crate::primitives::{SymmTensor, Tensor, Vector};
    pub use crate::tmp::{Tmp, TmpField};
    pub use crate::value::{FieldValue, Scalar};
    pub use ff_foundation::dimension::{dims, DimensionSet};
    pub use ff_foundation::error::{FieldError, FieldResult};
}
