//! # Byte Feature Extraction
//!
//! Computes the fixed statistic set over the 16 decoded hash bytes.
//!
//! ## Definitions
//!
//! With bytes `b_0..b_15`, `n = 16`, and mean `μ`:
//!
//! ```text
//! entropy      = -Σ p_v · log2(p_v)          over observed values v, p_v = count_v / n
//! m_k          = (1/n) Σ (b_i - μ)^k          population central moments
//! stddev       = √m_2
//! skewness     = m_3 / m_2^{3/2}              (0 when m_2 = 0)
//! kurtosis     = m_4 / m_2^2 - 3              excess, (0 when m_2 = 0)
//! gradient     = Σ_{i=1}^{15} |b_i - b_{i-1}|
//! bias_rolling = gradient / 15
//! hex_density  = #{ b_i ≥ 8 } / n
//! repetition   = max(0, 1 - distinct / n)
//! ```
//!
//! `hex_density` compares each whole byte against 8; it is not a property of
//! hex digits.
//!
//! The CRC16 (poly 0x1021, init 0xFFFF, no reflection, no final xor) is
//! carried for display only and never feeds the score.

use serde::Serialize;

use crate::decode::{BYTE_LEN, ByteBuffer};

const N: f64 = BYTE_LEN as f64;

/// Successive-difference pairs in a buffer.
const PAIRS: u32 = (BYTE_LEN - 1) as u32;

const CRC16_POLY: u16 = 0x1021;
const CRC16_INIT: u16 = 0xFFFF;

/// Hex-density cutoff. Compared against the full byte value.
const DENSITY_CUTOFF: u8 = 8;

/// Statistics derived once per analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSet {
    pub entropy: f64,
    pub stddev: f64,
    pub gradient: u32,
    pub bias_rolling: f64,
    pub hex_density: f64,
    pub repetition_penalty: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    /// Diagnostic only.
    pub crc16: u16,
}

impl FeatureSet {
    /// Floating-point fields by name, in diagnostic order.
    #[must_use]
    pub fn float_fields(&self) -> [(&'static str, f64); 7] {
        [
            ("entropy", self.entropy),
            ("stddev", self.stddev),
            ("bias_rolling", self.bias_rolling),
            ("hex_density", self.hex_density),
            ("repetition_penalty", self.repetition_penalty),
            ("skewness", self.skewness),
            ("kurtosis", self.kurtosis),
        ]
    }
}

/// Compute every feature for one buffer.
#[must_use]
pub fn extract(buf: &ByteBuffer) -> FeatureSet {
    let bytes = buf.as_bytes();
    let counts = histogram(bytes);
    let moments = Moments::of(bytes);
    let gradient = gradient(bytes);

    FeatureSet {
        entropy: entropy(&counts),
        stddev: moments.m2.sqrt(),
        gradient,
        bias_rolling: f64::from(gradient) / f64::from(PAIRS),
        hex_density: hex_density(bytes),
        repetition_penalty: repetition_penalty(&counts),
        skewness: moments.skewness(),
        kurtosis: moments.excess_kurtosis(),
        crc16: crc16(bytes),
    }
}

fn histogram(bytes: &[u8]) -> [u16; 256] {
    let mut counts = [0u16; 256];
    for &b in bytes {
        counts[usize::from(b)] += 1;
    }
    counts
}

/// Shannon entropy in bits over observed values only.
fn entropy(counts: &[u16; 256]) -> f64 {
    // Accumulating by subtraction from +0.0 keeps a single-valued buffer at +0.0.
    counts
        .iter()
        .filter(|&&c| c > 0)
        .fold(0.0_f64, |acc, &c| {
            let p = f64::from(c) / N;
            acc - p * p.log2()
        })
}

fn repetition_penalty(counts: &[u16; 256]) -> f64 {
    let distinct = counts.iter().filter(|&&c| c > 0).count();
    (1.0 - distinct as f64 / N).max(0.0)
}

fn gradient(bytes: &[u8]) -> u32 {
    bytes
        .windows(2)
        .map(|w| u32::from(w[0].abs_diff(w[1])))
        .sum()
}

fn hex_density(bytes: &[u8]) -> f64 {
    let dense = bytes.iter().filter(|&&b| b >= DENSITY_CUTOFF).count();
    dense as f64 / N
}

/// Population central moments.
#[derive(Debug, Clone, Copy)]
struct Moments {
    m2: f64,
    m3: f64,
    m4: f64,
}

impl Moments {
    fn of(bytes: &[u8]) -> Self {
        let mean = bytes.iter().map(|&b| f64::from(b)).sum::<f64>() / N;
        let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
        for &b in bytes {
            let d = f64::from(b) - mean;
            let d2 = d * d;
            s2 += d2;
            s3 += d2 * d;
            s4 += d2 * d2;
        }
        Self {
            m2: s2 / N,
            m3: s3 / N,
            m4: s4 / N,
        }
    }

    fn skewness(self) -> f64 {
        if self.m2 == 0.0 {
            return 0.0;
        }
        self.m3 / self.m2.powf(1.5)
    }

    fn excess_kurtosis(self) -> f64 {
        if self.m2 == 0.0 {
            return 0.0;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }
}

/// CRC-16 with polynomial 0x1021 and initial register 0xFFFF.
#[must_use]
pub fn crc16(bytes: &[u8]) -> u16 {
    let mut crc = CRC16_INIT;
    for &b in bytes {
        crc ^= u16::from(b) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC16_POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn features(hex: &str) -> FeatureSet {
        extract(&decode(hex).unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn uniform_buffer_is_degenerate_but_finite() {
        let f = features("00000000000000000000000000000000");
        assert_eq!(f.entropy, 0.0);
        assert!(f.entropy.is_sign_positive());
        assert_eq!(f.stddev, 0.0);
        assert_eq!(f.skewness, 0.0);
        assert_eq!(f.kurtosis, 0.0);
        assert_eq!(f.gradient, 0);
        assert_eq!(f.bias_rolling, 0.0);
        assert_eq!(f.hex_density, 0.0);
        assert!(close(f.repetition_penalty, 0.9375));
    }

    #[test]
    fn all_distinct_bytes_have_four_bits_of_entropy() {
        let f = features("d41d8cd98f00b204e9800998ecf8427e");
        assert!(close(f.entropy, 4.0));
        assert_eq!(f.repetition_penalty, 0.0);
        assert_eq!(f.gradient, 1874);
        assert!(close(f.bias_rolling, 1874.0 / 15.0));
        assert!(close(f.hex_density, 0.875));
        assert!(close(f.stddev, 84.686_162_351_059_45));
        assert!(close(f.skewness, -0.296_655_154_283_467_6));
        assert!(close(f.kurtosis, -1.251_834_812_318_733_5));
    }

    #[test]
    fn alternating_extremes_hit_minimum_kurtosis() {
        let f = features("ff00ff00ff00ff00ff00ff00ff00ff00");
        assert!(close(f.entropy, 1.0));
        assert!(close(f.stddev, 127.5));
        assert_eq!(f.gradient, 3825);
        assert!(close(f.bias_rolling, 255.0));
        assert!(close(f.hex_density, 0.5));
        assert!(close(f.skewness, 0.0));
        assert!(close(f.kurtosis, -2.0));
    }

    #[test]
    fn single_outlier_is_right_skewed_and_heavy_tailed() {
        let f = features("00000000000000000000000000000001");
        assert!(close(f.entropy, 0.337_290_066_617_013_9));
        assert!(close(f.skewness, 3.614_784_456_460_255_6));
        assert!(close(f.kurtosis, 11.066_666_666_666_666));
        assert_eq!(f.gradient, 1);
    }

    #[test]
    fn hex_density_counts_whole_bytes_against_eight() {
        // 0x07 is below the cutoff, 0x08 is at it.
        let f = features("0707070707070707080808080808080f");
        assert!(close(f.hex_density, 8.0 / 16.0));
    }

    #[test]
    fn crc16_reference_values() {
        assert_eq!(crc16(&[0u8; 16]), 27146);
        assert_eq!(crc16(&[0xFFu8; 16]), 27211);
        // Standard CRC-16/CCITT-FALSE check value.
        assert_eq!(crc16(b"123456789"), 0x29B1);
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn crc16_does_not_depend_on_scoring_inputs() {
        let a = features("0123456789abcdef0123456789abcdef");
        let b = features("0123456789abcdef0123456789abcdef");
        assert_eq!(a.crc16, 36751);
        assert_eq!(a, b);
    }
}
