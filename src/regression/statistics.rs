// Statistical primitives for endpoint regression detection
//
// Self-contained approximations, no lookup tables:
// - Standard normal CDF via the Zelen & Severo polynomial (|error| < 7.5e-8)
// - Two-sided Welch's t-test p-value from summary statistics (mean, std-dev, n)
//
// Scientific Foundation:
// - Zelen, M. & Severo, N. C. (1964). Handbook of Mathematical Functions, 26.2.17.
// - Welch, B. L. (1947). The generalization of "Student's" problem when several
//   different population variances are involved. Biometrika 34.
//
// Large-sample tests (df > 30) use the normal approximation. Smaller df fall back to
// the closed-form surrogate 2·exp(-0.717t - 0.416t²), which is conservative and is
// NOT a Student-t inversion.

/// Degrees of freedom above which the normal approximation is used
pub const NORMAL_APPROX_MIN_DF: f64 = 30.0;

const ZS_P: f64 = 0.231_641_9;
const ZS_B1: f64 = 0.319_381_530;
const ZS_B2: f64 = -0.356_563_782;
const ZS_B3: f64 = 1.781_477_937;
const ZS_B4: f64 = -1.821_255_978;
const ZS_B5: f64 = 1.330_274_429;

/// 1 / sqrt(2π)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Cumulative distribution function of the standard normal distribution
///
/// For `z <= 0` the lower tail is evaluated directly; for `z > 0` the result is
/// `1 - Φ(-z)`, so the polynomial is only ever evaluated on the non-positive half.
///
/// # Example
/// ```
/// use runcompare::regression::normal_cdf;
///
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!((normal_cdf(1.96) - 0.975).abs() < 1e-4);
/// ```
pub fn normal_cdf(z: f64) -> f64 {
    if z > 0.0 {
        1.0 - lower_tail(-z)
    } else {
        lower_tail(z)
    }
}

/// Φ(z) for z <= 0
fn lower_tail(z: f64) -> f64 {
    let t = 1.0 / (1.0 - ZS_P * z);
    let poly = t * (ZS_B1 + t * (ZS_B2 + t * (ZS_B3 + t * (ZS_B4 + t * ZS_B5))));
    let density = INV_SQRT_2PI * (-0.5 * z * z).exp();

    (density * poly).clamp(0.0, 1.0)
}

/// Two-sided p-value of Welch's unequal-variance t-test from summary statistics
///
/// Returns a probability in `[0, 1]`; smaller means stronger evidence that the two
/// means differ.
///
/// Degenerate inputs resolve deterministically instead of producing NaN:
/// - either sample smaller than 2: `1.0`
/// - zero standard error (e.g. both std-devs zero): `1.0` when the means are equal,
///   `0.0` when they differ
///
/// # Example
/// ```
/// use runcompare::regression::welch_p_value;
///
/// // Tight distributions 5 units apart: overwhelming evidence
/// assert!(welch_p_value(100.0, 1.0, 50, 105.0, 1.0, 50) < 1e-6);
///
/// // Too few samples to say anything
/// assert_eq!(welch_p_value(100.0, 1.0, 1, 500.0, 1.0, 50), 1.0);
/// ```
pub fn welch_p_value(mean1: f64, sd1: f64, n1: u64, mean2: f64, sd2: f64, n2: u64) -> f64 {
    if n1 < 2 || n2 < 2 {
        return 1.0;
    }

    if sd1 == 0.0 && sd2 == 0.0 {
        return deterministic_p_value(mean1, mean2);
    }

    let (n1, n2) = (n1 as f64, n2 as f64);
    let v1 = sd1 * sd1 / n1;
    let v2 = sd2 * sd2 / n2;
    let se = (v1 + v2).sqrt();

    if se == 0.0 {
        return deterministic_p_value(mean1, mean2);
    }

    let t = (mean1 - mean2).abs() / se;
    let df = (v1 + v2).powi(2) / (v1 * v1 / (n1 - 1.0) + v2 * v2 / (n2 - 1.0));

    let p = if df > NORMAL_APPROX_MIN_DF {
        2.0 * (1.0 - normal_cdf(t))
    } else {
        (2.0 * (-0.717 * t - 0.416 * t * t).exp()).min(1.0)
    };

    p.clamp(0.0, 1.0)
}

/// Zero-variance resolution: equal means carry no evidence, different means are certain
fn deterministic_p_value(mean1: f64, mean2: f64) -> f64 {
    if mean1 == mean2 {
        1.0
    } else {
        0.0
    }
}
