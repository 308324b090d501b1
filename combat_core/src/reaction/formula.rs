//! Reaction damage formulas

/// `base × (1 + 16·EM / (EM + 2000)) × multiplier`, truncated
pub fn transformative_damage(em: f64, multiplier: f64, base: f64) -> i64 {
    let em = em.max(0.0);
    let em_bonus = 1.0 + 16.0 * em / (em + 2000.0);
    (base * em_bonus * multiplier).max(0.0).trunc() as i64
}

/// `multiplier × (1 + em_factor·EM / (1400 + EM))`
pub fn amplifying_multiplier(em: f64, multiplier: f64, em_factor: f64) -> f64 {
    let em = em.max(0.0);
    multiplier * (1.0 + em_factor * em / (1400.0 + em))
}

/// `coefficient × base × (1 + 5·EM / (EM + 1200))`
pub fn additive_bonus(em: f64, coefficient: f64, base: f64) -> f64 {
    let em = em.max(0.0);
    coefficient * base * (1.0 + 5.0 * em / (em + 1200.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transformative_no_em() {
        assert_eq!(transformative_damage(0.0, 3.0, 1446.0), 4338);
        assert_eq!(transformative_damage(0.0, 0.6, 1446.0), 867);
    }

    #[test]
    fn test_transformative_with_em() {
        // 1446 * (1 + 16 * 0.5) * 1
        assert_eq!(transformative_damage(2000.0, 1.0, 1446.0), 13014);
    }

    #[test]
    fn test_amplifying() {
        assert!((amplifying_multiplier(0.0, 2.0, 2.78) - 2.0).abs() < 1e-12);
        // 1.5 * (1 + 2.78 * 0.5)
        assert!((amplifying_multiplier(1400.0, 1.5, 2.78) - 3.585).abs() < 1e-9);
    }

    #[test]
    fn test_additive() {
        assert!((additive_bonus(0.0, 1.15, 1447.0) - 1664.05).abs() < 1e-9);
        // 1.25 * 1447 * (1 + 5 * 0.5)
        assert!((additive_bonus(1200.0, 1.25, 1447.0) - 6330.625).abs() < 1e-9);
    }
}
