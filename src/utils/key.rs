use rand::Rng;

/// 36 进制数字表
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 随机小数展开的 36 进制位数
const FRACTION_DIGITS: usize = 11;

/// 展开结果中丢弃的前导位数
const SKIPPED_DIGITS: usize = 5;

/// 将 `[0, 1)` 区间内的小数展开为 36 进制的小数位
///
/// 末尾的 0 会被去掉，与常见的数字转字符串行为一致。
///
/// # 示例
///
/// ```
/// use upload_server::utils::key::fraction_to_base36;
///
/// assert_eq!(fraction_to_base36(0.5, 11), "i");
/// assert_eq!(fraction_to_base36(0.0, 11), "");
/// ```
pub fn fraction_to_base36(fraction: f64, digits: usize) -> String {
    let mut value = fraction.fract().abs();
    let mut result = String::with_capacity(digits);

    for _ in 0..digits {
        value *= 36.0;
        let digit = (value.trunc() as usize).min(BASE36_DIGITS.len() - 1);
        value -= digit as f64;
        result.push(BASE36_DIGITS[digit] as char);
    }

    result.trim_end_matches('0').to_string()
}

/// 由随机小数生成对象键，丢弃前几位后剩余位数为空时返回 `None`
pub fn key_from_fraction(fraction: f64) -> Option<String> {
    fraction_to_base36(fraction, FRACTION_DIGITS)
        .get(SKIPPED_DIGITS..)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

/// 生成随机对象键
///
/// 结果只包含小写字母和数字，长度通常为 6。
pub fn random_key() -> String {
    let mut rng = rand::thread_rng();
    loop {
        if let Some(key) = key_from_fraction(rng.r#gen::<f64>()) {
            return key;
        }
    }
}
