// lca-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Energy as UomEnergy, Length as UomLength, Mass as UomMass,
    Volume as UomVolume,
};

use crate::{CoreError, CoreResult, Real, ensure_finite};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Volume = UomVolume;

/// Flow properties that amounts can be normalised against.
///
/// The names match the flow property names of the reference data in the
/// external model store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceProperty {
    Mass,
    Volume,
    Energy,
    Area,
    Length,
}

impl ReferenceProperty {
    pub const ALL: [ReferenceProperty; 5] = [
        ReferenceProperty::Mass,
        ReferenceProperty::Volume,
        ReferenceProperty::Energy,
        ReferenceProperty::Area,
        ReferenceProperty::Length,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            ReferenceProperty::Mass => "Mass",
            ReferenceProperty::Volume => "Volume",
            ReferenceProperty::Energy => "Energy",
            ReferenceProperty::Area => "Area",
            ReferenceProperty::Length => "Length",
        }
    }

    /// Symbol of the reference unit amounts are normalised to.
    pub fn reference_unit(self) -> &'static str {
        match self {
            ReferenceProperty::Mass => "kg",
            ReferenceProperty::Volume => "m3",
            ReferenceProperty::Energy => "MJ",
            ReferenceProperty::Area => "m2",
            ReferenceProperty::Length => "m",
        }
    }
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn mj(v: f64) -> Energy {
    use uom::si::energy::megajoule;
    Energy::new::<megajoule>(v)
}

fn mass_in(v: f64, unit: &str) -> Option<Mass> {
    use uom::si::mass::{gram, kilogram, pound, ton};
    Some(match unit {
        "kg" => Mass::new::<kilogram>(v),
        "g" => Mass::new::<gram>(v),
        "t" | "tonne" => Mass::new::<ton>(v),
        "lb" => Mass::new::<pound>(v),
        _ => return None,
    })
}

fn volume_in(v: f64, unit: &str) -> Option<Volume> {
    use uom::si::volume::{cubic_centimeter, cubic_meter, liter, milliliter};
    Some(match unit {
        "m3" | "m³" => Volume::new::<cubic_meter>(v),
        "l" | "L" => Volume::new::<liter>(v),
        "ml" | "mL" => Volume::new::<milliliter>(v),
        "cm3" | "cm³" => Volume::new::<cubic_centimeter>(v),
        _ => return None,
    })
}

fn energy_in(v: f64, unit: &str) -> Option<Energy> {
    use uom::si::energy::{joule, kilowatt_hour, megajoule};
    Some(match unit {
        "MJ" => Energy::new::<megajoule>(v),
        "kWh" => Energy::new::<kilowatt_hour>(v),
        "J" => Energy::new::<joule>(v),
        _ => return None,
    })
}

fn area_in(v: f64, unit: &str) -> Option<Area> {
    use uom::si::area::{square_centimeter, square_meter};
    Some(match unit {
        "m2" | "m²" => Area::new::<square_meter>(v),
        "cm2" | "cm²" => Area::new::<square_centimeter>(v),
        _ => return None,
    })
}

fn length_in(v: f64, unit: &str) -> Option<Length> {
    use uom::si::length::{centimeter, kilometer, meter};
    Some(match unit {
        "m" => Length::new::<meter>(v),
        "km" => Length::new::<kilometer>(v),
        "cm" => Length::new::<centimeter>(v),
        _ => return None,
    })
}

/// Convert `amount` given in `unit` to the reference unit of `property`.
///
/// Without a unit the amount is taken to already be in the reference unit.
/// Properties outside [`ReferenceProperty`] pass through unchanged.
pub fn normalize_amount(amount: Real, unit: Option<&str>, property: &str) -> CoreResult<Real> {
    let amount = ensure_finite(amount, "amount")?;
    let Some(unit) = unit.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(amount);
    };
    let Some(prop) = ReferenceProperty::from_name(property) else {
        return Ok(amount);
    };

    let converted = match prop {
        ReferenceProperty::Mass => {
            mass_in(amount, unit).map(|q| q.get::<uom::si::mass::kilogram>())
        }
        ReferenceProperty::Volume => {
            volume_in(amount, unit).map(|q| q.get::<uom::si::volume::cubic_meter>())
        }
        ReferenceProperty::Energy => {
            energy_in(amount, unit).map(|q| q.get::<uom::si::energy::megajoule>())
        }
        ReferenceProperty::Area => {
            area_in(amount, unit).map(|q| q.get::<uom::si::area::square_meter>())
        }
        ReferenceProperty::Length => {
            length_in(amount, unit).map(|q| q.get::<uom::si::length::meter>())
        }
    };

    converted.ok_or_else(|| CoreError::UnknownUnit {
        unit: unit.to_string(),
        property: prop.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn constructors_round_trip() {
        use uom::si::energy::kilowatt_hour;
        use uom::si::mass::gram;
        use uom::si::volume::liter;
        assert!(close(kg(1.5).get::<gram>(), 1500.0));
        assert!(close(m3(1.0).get::<liter>(), 1000.0));
        assert!(close(mj(3.6).get::<kilowatt_hour>(), 1.0));
    }

    #[test]
    fn property_names_are_case_insensitive() {
        assert_eq!(
            ReferenceProperty::from_name(" volume "),
            Some(ReferenceProperty::Volume)
        );
        assert_eq!(ReferenceProperty::from_name("Radioactivity"), None);
    }

    #[test]
    fn mass_is_normalised_to_kg() {
        assert!(close(normalize_amount(1.2, Some("t"), "Mass").unwrap(), 1200.0));
        assert!(close(normalize_amount(500.0, Some("g"), "Mass").unwrap(), 0.5));
    }

    #[test]
    fn volume_is_normalised_to_m3() {
        assert!(close(normalize_amount(250.0, Some("L"), "Volume").unwrap(), 0.25));
    }

    #[test]
    fn missing_unit_passes_through() {
        assert_eq!(normalize_amount(7.0, None, "Mass").unwrap(), 7.0);
        assert_eq!(normalize_amount(7.0, Some("  "), "Mass").unwrap(), 7.0);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = normalize_amount(1.0, Some("furlong"), "Mass").unwrap_err();
        assert!(matches!(err, CoreError::UnknownUnit { .. }));
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        assert!(normalize_amount(f64::INFINITY, Some("kg"), "Mass").is_err());
    }

    use proptest::prelude::*;

    const SCALES: [(&str, &str, f64); 8] = [
        ("Mass", "t", 1000.0),
        ("Mass", "g", 1e-3),
        ("Volume", "L", 1e-3),
        ("Volume", "cm3", 1e-6),
        ("Energy", "kWh", 3.6),
        ("Energy", "J", 1e-6),
        ("Area", "cm2", 1e-4),
        ("Length", "km", 1000.0),
    ];

    proptest! {
        #[test]
        fn reference_unit_is_identity(amount in 0.0f64..1e6, i in 0usize..5) {
            let prop = ReferenceProperty::ALL[i];
            let v = normalize_amount(amount, Some(prop.reference_unit()), prop.name()).unwrap();
            prop_assert!(close(v, amount));
        }

        #[test]
        fn units_scale_linearly(amount in 0.0f64..1e6, i in 0usize..SCALES.len()) {
            let (property, unit, factor) = SCALES[i];
            let v = normalize_amount(amount, Some(unit), property).unwrap();
            prop_assert!(close(v, amount * factor), "{amount} {unit} -> {v}");
        }
    }
}
