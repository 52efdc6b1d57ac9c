// crates/ff_foundation/src/numerics/kahan_sum.rs

//! 补偿（Kahan）求和

use std::ops::{Add, Sub};

/// 任意可加值类型上的 Kahan 求和器
///
/// 补偿项与和同类型保存，因此矢量与张量值逐分量补偿。
///
/// # 示例
///
/// ```rust
/// use ff_foundation::numerics::KahanSum;
///
/// let total = KahanSum::sum_iter(std::iter::repeat(0.1_f64).take(1000));
/// assert!((total - 100.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum<S> {
    sum: S,
    compensation: S,
}

impl<S> KahanSum<S>
where
    S: Copy + Default + Add<Output = S> + Sub<Output = S>,
{
    /// 创建空累加器
    pub fn new() -> Self {
        Self {
            sum: S::default(),
            compensation: S::default(),
        }
    }

    /// 累加一个值
    #[inline]
    pub fn add(&mut self, value: S) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// 当前和
    #[inline]
    pub fn value(&self) -> S {
        self.sum
    }

    /// 重置为零
    #[inline]
    pub fn reset(&mut self) {
        self.sum = S::default();
        self.compensation = S::default();
    }

    /// 对迭代器求和
    pub fn sum_iter<I: IntoIterator<Item = S>>(iter: I) -> S {
        let mut kahan = Self::new();
        for v in iter {
            kahan.add(v);
        }
        kahan.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kahan_sum_f64() {
        let data = vec![0.1f64; 1000];
        let sum = KahanSum::sum_iter(data.iter().cloned());
        assert!((sum - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_kahan_beats_naive() {
        let mut values = vec![1.0e16_f64];
        values.extend(std::iter::repeat(1.0).take(1000));
        let naive: f64 = values.iter().sum();
        let compensated = KahanSum::sum_iter(values.iter().cloned());
        assert_eq!(compensated, 1.0e16 + 1000.0);
        assert!(naive < compensated);
    }

    #[test]
    fn test_reset() {
        let mut k = KahanSum::new();
        k.add(3.0_f64);
        k.reset();
        assert_eq!(k.value(), 0.0);
    }
}
