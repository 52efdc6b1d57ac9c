// crates/ff_field/src/kernel.rs

//! 逐元素内核与操作数分发
//!
//! 每个二元运算符将两个参数转换为 [`Operand`] 并调用一个内核。
//! 内核穷举匹配操作数种类组合，并决定结果写入位置：
//!
//! | lhs \ rhs | Field            | Tmp              | Uniform   |
//! |-----------|------------------|------------------|-----------|
//! | Field     | 新分配           | 复用 rhs         | 新分配    |
//! | Tmp       | 复用 lhs         | 复用 lhs         | 复用 lhs  |
//! | Uniform   | 新分配           | 复用 rhs         | 错误      |
//!
//! 复用要求输出元素类型与被复用缓冲区布局相同；否则新分配缓冲区并丢弃有所有权的输入。
//! 写入之前先检查长度。
//!
//! 元素数不少于 [`PARALLEL_THRESHOLD`] 的操作数使用 rayon 并行处理。
//! 所有内核均为逐元素运算，结果与划分方式无关。

use bytemuck::Pod;
use ff_foundation::error::{FieldError, FieldResult};
use rayon::prelude::*;

use crate::dimensioned::Dimensioned;
use crate::field::Field;
use crate::tmp::Tmp;
use crate::value::FieldValue;

/// 并行求值的最小长度
pub const PARALLEL_THRESHOLD: usize = 16_384;

/// 逐元素运算的一个参数
#[derive(Debug)]
pub enum Operand<'a, T> {
    /// 借用的持久存储；不会被写入
    Field(&'a [T]),
    /// 无其他使用者的自有存储；可被覆盖
    Tmp(Vec<T>),
    /// 广播到另一操作数的单个值
    Uniform(T),
}

impl<'a, T> Operand<'a, T> {
    /// 元素数量，均匀值为 `None`
    pub fn len(&self) -> Option<usize> {
        match self {
            Operand::Field(s) => Some(s.len()),
            Operand::Tmp(v) => Some(v.len()),
            Operand::Uniform(_) => None,
        }
    }

    /// 是否为自有存储
    pub fn is_owned(&self) -> bool {
        matches!(self, Operand::Tmp(_))
    }

    /// 用于诊断的简短种类名
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Field(_) => "field",
            Operand::Tmp(_) => "tmp",
            Operand::Uniform(_) => "uniform",
        }
    }
}

/// 将运算符参数转换为 [`Operand`]
pub trait IntoOperand<'a, T> {
    /// 执行转换
    fn into_operand(self) -> Operand<'a, T>;
}

impl<'a, T: FieldValue> IntoOperand<'a, T> for &'a Field<T> {
    #[inline]
    fn into_operand(self) -> Operand<'a, T> {
        Operand::Field(self.as_slice())
    }
}

/// 按值传入的 `Field` 像临时量一样交出存储
impl<'a, T: FieldValue> IntoOperand<'a, T> for Field<T> {
    #[inline]
    fn into_operand(self) -> Operand<'a, T> {
        Operand::Tmp(self.into_vec())
    }
}

impl<'a, T: FieldValue> IntoOperand<'a, T> for Tmp<Field<T>> {
    #[inline]
    fn into_operand(self) -> Operand<'a, T> {
        Operand::Tmp(self.into_vec())
    }
}

/// 有量纲值只提供数值；量纲由调用方处理
impl<'a, 'b, T: FieldValue> IntoOperand<'a, T> for &'b Dimensioned<T> {
    #[inline]
    fn into_operand(self) -> Operand<'a, T> {
        Operand::Uniform(*self.value())
    }
}

impl<'a, T> IntoOperand<'a, T> for Operand<'a, T> {
    #[inline]
    fn into_operand(self) -> Operand<'a, T> {
        self
    }
}

/// 普通值被广播
impl<'a, T: FieldValue> IntoOperand<'a, T> for T {
    #[inline]
    fn into_operand(self) -> Operand<'a, T> {
        Operand::Uniform(self)
    }
}

// ============================================================================
// 循环辅助函数
// ============================================================================

/// 对每个 `i` 执行 `f(out[i], other[i])`
pub(crate) fn update_with<T, U, F>(out: &mut [T], other: &[U], f: F)
where
    T: Send,
    U: Copy + Sync,
    F: Fn(&mut T, U) + Sync + Send,
{
    if out.len() >= PARALLEL_THRESHOLD {
        out.par_iter_mut()
            .zip(other.par_iter())
            .for_each(|(o, &x)| f(o, x));
    } else {
        out.iter_mut().zip(other).for_each(|(o, &x)| f(o, x));
    }
}

/// 对每个 `i` 执行 `f(out[i])`
pub(crate) fn update<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(&mut T) + Sync + Send,
{
    if out.len() >= PARALLEL_THRESHOLD {
        out.par_iter_mut().for_each(f);
    } else {
        out.iter_mut().for_each(f);
    }
}

fn collect_zip<A, B, R, F>(a: &[A], b: &[B], f: F) -> Vec<R>
where
    A: Copy + Sync,
    B: Copy + Sync,
    R: Send,
    F: Fn(A, B) -> R + Sync + Send,
{
    if a.len() >= PARALLEL_THRESHOLD {
        a.par_iter().zip(b.par_iter()).map(|(&x, &y)| f(x, y)).collect()
    } else {
        a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
    }
}

fn collect_map<A, R, F>(a: &[A], f: F) -> Vec<R>
where
    A: Copy + Sync,
    R: Send,
    F: Fn(A) -> R + Sync + Send,
{
    if a.len() >= PARALLEL_THRESHOLD {
        a.par_iter().map(|&x| f(x)).collect()
    } else {
        a.iter().map(|&x| f(x)).collect()
    }
}

fn check_pair<A, B>(operation: &'static str, lhs: &Operand<'_, A>, rhs: &Operand<'_, B>) -> FieldResult<()> {
    match (lhs.len(), rhs.len()) {
        (Some(l), Some(r)) => FieldError::check_length(operation, l, r),
        (None, None) => Err(uniform_pair(operation)),
        _ => Ok(()),
    }
}

fn uniform_pair(operation: &'static str) -> FieldError {
    FieldError::invalid_operation(operation, "two uniform operands, at least one field is required")
}

// ============================================================================
// 内核
// ============================================================================

/// `f(lhs, rhs)`，两个操作数与结果元素类型相同
pub fn zip_same<'a, T, F>(
    operation: &'static str,
    lhs: Operand<'a, T>,
    rhs: Operand<'a, T>,
    f: F,
) -> FieldResult<Vec<T>>
where
    T: FieldValue,
    F: Fn(T, T) -> T + Sync + Send,
{
    check_pair(operation, &lhs, &rhs)?;
    match (lhs, rhs) {
        (Operand::Tmp(mut out), rhs) => {
            log::trace!("'{operation}': reusing lhs storage ({} elements)", out.len());
            match rhs {
                Operand::Field(b) => update_with(&mut out, b, |o, x| *o = f(*o, x)),
                Operand::Tmp(b) => update_with(&mut out, &b, |o, x| *o = f(*o, x)),
                Operand::Uniform(s) => update(&mut out, |o| *o = f(*o, s)),
            }
            Ok(out)
        }
        (lhs, Operand::Tmp(mut out)) => {
            log::trace!("'{operation}': reusing rhs storage ({} elements)", out.len());
            match lhs {
                Operand::Field(a) => update_with(&mut out, a, |o, x| *o = f(x, *o)),
                Operand::Tmp(a) => update_with(&mut out, &a, |o, x| *o = f(x, *o)),
                Operand::Uniform(s) => update(&mut out, |o| *o = f(s, *o)),
            }
            Ok(out)
        }
        (Operand::Field(a), Operand::Field(b)) => Ok(collect_zip(a, b, f)),
        (Operand::Field(a), Operand::Uniform(s)) => Ok(collect_map(a, |x| f(x, s))),
        (Operand::Uniform(s), Operand::Field(b)) => Ok(collect_map(b, |x| f(s, x))),
        (Operand::Uniform(_), Operand::Uniform(_)) => Err(uniform_pair(operation)),
    }
}

/// `f(lhs, factor)`，右操作数为标量类型；结果元素类型同 `lhs`。
///
/// `T` 与 `f64` 布局相同时复用有所有权的右操作数
pub fn zip_scale<'a, T, F>(
    operation: &'static str,
    lhs: Operand<'a, T>,
    rhs: Operand<'a, f64>,
    f: F,
) -> FieldResult<Vec<T>>
where
    T: FieldValue,
    F: Fn(T, f64) -> T + Sync + Send,
{
    check_pair(operation, &lhs, &rhs)?;
    match (lhs, rhs) {
        (Operand::Tmp(mut out), rhs) => {
            log::trace!("'{operation}': reusing lhs storage ({} elements)", out.len());
            match rhs {
                Operand::Field(b) => update_with(&mut out, b, |o, s| *o = f(*o, s)),
                Operand::Tmp(b) => update_with(&mut out, &b, |o, s| *o = f(*o, s)),
                Operand::Uniform(s) => update(&mut out, |o| *o = f(*o, s)),
            }
            Ok(out)
        }
        (lhs, Operand::Tmp(factors)) => match reuse_as::<f64, T>(factors) {
            Ok(mut out) => {
                log::trace!("'{operation}': reusing rhs storage ({} elements)", out.len());
                let factor = |o: T| bytemuck::cast::<T, f64>(o);
                match lhs {
                    Operand::Field(a) => update_with(&mut out, a, |o, x| *o = f(x, factor(*o))),
                    Operand::Tmp(a) => update_with(&mut out, &a, |o, x| *o = f(x, factor(*o))),
                    Operand::Uniform(v) => update(&mut out, |o| *o = f(v, factor(*o))),
                }
                Ok(out)
            }
            Err(factors) => Ok(match lhs {
                Operand::Field(a) => collect_zip(a, &factors, f),
                Operand::Tmp(a) => collect_zip(&a, &factors, f),
                Operand::Uniform(v) => collect_map(&factors, |s| f(v, s)),
            }),
        },
        (Operand::Field(a), Operand::Field(b)) => Ok(collect_zip(a, b, f)),
        (Operand::Field(a), Operand::Uniform(s)) => Ok(collect_map(a, |x| f(x, s))),
        (Operand::Uniform(v), Operand::Field(b)) => Ok(collect_map(b, |s| f(v, s))),
        (Operand::Uniform(_), Operand::Uniform(_)) => Err(uniform_pair(operation)),
    }
}

/// `f(lhs, rhs)`，元素类型任意；总是写入新缓冲区
pub fn zip_map<'a, A, B, R, F>(
    operation: &'static str,
    lhs: Operand<'a, A>,
    rhs: Operand<'a, B>,
    f: F,
) -> FieldResult<Vec<R>>
where
    A: FieldValue,
    B: FieldValue,
    R: Send,
    F: Fn(A, B) -> R + Sync + Send,
{
    check_pair(operation, &lhs, &rhs)?;
    let out = match (&lhs, &rhs) {
        (Operand::Uniform(_), Operand::Uniform(_)) => return Err(uniform_pair(operation)),
        (Operand::Uniform(a), rhs) => collect_map(slice_of(rhs), |y| f(*a, y)),
        (lhs, Operand::Uniform(b)) => collect_map(slice_of(lhs), |x| f(x, *b)),
        (lhs, rhs) => collect_zip(slice_of(lhs), slice_of(rhs), f),
    };
    Ok(out)
}

/// 两种元素类型大小一致时将自有存储重解释为 `Vec<R>`
fn reuse_as<T: Pod, R: Pod>(data: Vec<T>) -> Result<Vec<R>, Vec<T>> {
    if std::mem::size_of::<T>() != std::mem::size_of::<R>() {
        return Err(data);
    }
    bytemuck::allocation::try_cast_vec(data).map_err(|(_, data)| data)
}

/// 非均匀操作数的存储
fn slice_of<'s, T>(operand: &'s Operand<'_, T>) -> &'s [T] {
    match operand {
        Operand::Field(s) => s,
        Operand::Tmp(v) => v,
        Operand::Uniform(_) => &[],
    }
}

/// 逐元素 `f(arg)`；`R` 与 `T` 布局相同时复用自有存储
pub fn map<'a, T, R, F>(operation: &'static str, arg: Operand<'a, T>, f: F) -> FieldResult<Vec<R>>
where
    T: Pod + Send + Sync,
    R: Pod + Send + Sync,
    F: Fn(T) -> R + Sync + Send,
{
    match arg {
        Operand::Field(a) => Ok(collect_map(a, f)),
        Operand::Tmp(data) => match reuse_as::<T, R>(data) {
            Ok(mut out) => {
                log::trace!("'{operation}': reusing storage ({} elements)", out.len());
                update(&mut out, |o| *o = f(bytemuck::cast::<R, T>(*o)));
                Ok(out)
            }
            Err(data) => Ok(collect_map(&data, f)),
        },
        Operand::Uniform(_) => Err(FieldError::invalid_operation(
            operation,
            "a uniform operand has no storage to map over",
        )),
    }
}
