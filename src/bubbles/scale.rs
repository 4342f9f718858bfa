/// Square-root scale from `[0, domain_max]` onto `[0, max_radius]`, so bubble
/// area grows linearly with the value.
///
/// The scale is unclamped: values above `domain_max` keep following the
/// square-root curve. Non-positive values and an empty domain map to 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    domain_max: f32,
    max_radius: f32,
}

impl RadiusScale {
    pub fn new(domain_max: u64, max_radius: f32) -> Self {
        Self {
            domain_max: domain_max as f32,
            max_radius,
        }
    }

    pub fn radius(self, value: f32) -> f32 {
        if !(value > 0.0) || !(self.domain_max > 0.0) {
            return 0.0;
        }
        self.max_radius * (value / self.domain_max).sqrt()
    }

    pub fn collision_radius(self, value: f32, floor: f32) -> f32 {
        self.radius(value).max(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_root_mapping() {
        let scale = RadiusScale::new(100, 65.0);
        assert_eq!(scale.radius(100.0), 65.0);
        assert_eq!(scale.radius(25.0), 32.5);
        assert_eq!(scale.radius(0.0), 0.0);
    }

    #[test]
    fn non_positive_and_nan_inputs_map_to_zero() {
        let scale = RadiusScale::new(100, 65.0);
        assert_eq!(scale.radius(-4.0), 0.0);
        assert_eq!(scale.radius(f32::NAN), 0.0);
        assert_eq!(RadiusScale::new(0, 65.0).radius(10.0), 0.0);
    }

    #[test]
    fn extrapolates_past_the_domain() {
        let scale = RadiusScale::new(100, 65.0);
        assert_eq!(scale.radius(400.0), 130.0);
    }

    #[test]
    fn monotonic_over_the_domain() {
        let scale = RadiusScale::new(1_000, 65.0);
        let mut previous = scale.radius(0.0);
        for value in (0..=1_200).step_by(7) {
            let radius = scale.radius(value as f32);
            assert!(radius >= previous, "{value}: {radius} < {previous}");
            previous = radius;
        }
    }

    #[test]
    fn collision_radius_has_a_floor() {
        let scale = RadiusScale::new(100, 65.0);
        assert_eq!(scale.collision_radius(1.0, 10.0), 10.0);
        assert_eq!(scale.collision_radius(0.0, 10.0), 10.0);
        assert_eq!(scale.collision_radius(100.0, 10.0), 65.0);
    }
}
