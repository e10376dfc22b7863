use std::fmt;

// ---------------------------------------------------------------------------
// RedshiftGroup – fixed-breakpoint classification of redshift
// ---------------------------------------------------------------------------

/// Lower edge of group 1 (inclusive).
pub const GROUP_1_MIN: f64 = 0.0069;
/// Boundary between group 1 and group 2 (belongs to group 2).
pub const GROUP_2_MIN: f64 = 0.057;
/// Boundary between group 2 and group 3 (belongs to group 3).
pub const GROUP_3_MIN: f64 = 0.164;
/// Upper edge of group 3 (inclusive).
pub const GROUP_3_MAX: f64 = 0.348;

/// Redshift bin of a galaxy.
///
/// Variant order matches label order, so sorting groups sorts them by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RedshiftGroup {
    Group1,
    Group2,
    Group3,
    OutOfRange,
}

impl RedshiftGroup {
    pub const ALL: [RedshiftGroup; 4] = [
        RedshiftGroup::Group1,
        RedshiftGroup::Group2,
        RedshiftGroup::Group3,
        RedshiftGroup::OutOfRange,
    ];

    /// Classify a redshift. Total over `f64`: NaN and infinities are out of range.
    pub fn classify(z: f64) -> Self {
        if (GROUP_1_MIN..GROUP_2_MIN).contains(&z) {
            RedshiftGroup::Group1
        } else if (GROUP_2_MIN..GROUP_3_MIN).contains(&z) {
            RedshiftGroup::Group2
        } else if (GROUP_3_MIN..=GROUP_3_MAX).contains(&z) {
            RedshiftGroup::Group3
        } else {
            RedshiftGroup::OutOfRange
        }
    }

    /// Short label, also used as the exported cell value.
    pub fn label(self) -> &'static str {
        match self {
            RedshiftGroup::Group1 => "Group 1",
            RedshiftGroup::Group2 => "Group 2",
            RedshiftGroup::Group3 => "Group 3",
            RedshiftGroup::OutOfRange => "Out of range",
        }
    }

    /// Label with the redshift interval, for legends and headings.
    pub fn range_label(self) -> String {
        match self {
            RedshiftGroup::Group1 => format!("Group 1 ({GROUP_1_MIN}–{GROUP_2_MIN})"),
            RedshiftGroup::Group2 => format!("Group 2 ({GROUP_2_MIN}–{GROUP_3_MIN})"),
            RedshiftGroup::Group3 => format!("Group 3 ({GROUP_3_MIN}–{GROUP_3_MAX})"),
            RedshiftGroup::OutOfRange => "Out of range".to_string(),
        }
    }

    /// Classify a whole redshift column.
    pub fn classify_all(redshifts: &[f64]) -> Vec<RedshiftGroup> {
        redshifts.iter().map(|&z| Self::classify(z)).collect()
    }
}

impl fmt::Display for RedshiftGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(RedshiftGroup::classify(0.0069), RedshiftGroup::Group1);
        assert_eq!(RedshiftGroup::classify(0.0568), RedshiftGroup::Group1);
        assert_eq!(RedshiftGroup::classify(0.057), RedshiftGroup::Group2);
        assert_eq!(RedshiftGroup::classify(0.1639), RedshiftGroup::Group2);
        assert_eq!(RedshiftGroup::classify(0.164), RedshiftGroup::Group3);
        assert_eq!(RedshiftGroup::classify(0.348), RedshiftGroup::Group3);
    }

    #[test]
    fn values_outside_every_bin_are_out_of_range() {
        for z in [0.0, 0.0068, 0.3481, 1.2, -0.1, f64::NAN, f64::INFINITY] {
            assert_eq!(RedshiftGroup::classify(z), RedshiftGroup::OutOfRange, "z = {z}");
        }
    }

    #[test]
    fn ordering_follows_labels() {
        let mut labels: Vec<&str> = RedshiftGroup::ALL.iter().map(|g| g.label()).collect();
        let by_variant = labels.clone();
        labels.sort();
        assert_eq!(labels, by_variant);
    }

    #[test]
    fn classify_all_is_elementwise() {
        let groups = RedshiftGroup::classify_all(&[0.01, 0.2, 0.1, 0.5]);
        assert_eq!(
            groups,
            vec![
                RedshiftGroup::Group1,
                RedshiftGroup::Group3,
                RedshiftGroup::Group2,
                RedshiftGroup::OutOfRange
            ]
        );
    }
}
