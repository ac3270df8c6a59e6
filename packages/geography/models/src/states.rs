//! US state population reference table.
//!
//! Provides the 50 US states + DC with their two-letter abbreviation, the
//! full name as spelled in incident datasets, and the July 2015 population
//! estimate from the US Census Bureau.

use crate::StatePopulation;

/// Number of entries in [`STATE_POPULATIONS`].
pub const STATE_COUNT: usize = 51;

/// The 50 US states + DC, ordered alphabetically by full name.
pub const STATE_POPULATIONS: &[StatePopulation] = &[
    StatePopulation::new("AL", "Alabama", 4_858_979),
    StatePopulation::new("AK", "Alaska", 738_432),
    StatePopulation::new("AZ", "Arizona", 6_828_065),
    StatePopulation::new("AR", "Arkansas", 2_978_204),
    StatePopulation::new("CA", "California", 39_144_818),
    StatePopulation::new("CO", "Colorado", 5_456_574),
    StatePopulation::new("CT", "Connecticut", 3_590_886),
    StatePopulation::new("DE", "Delaware", 945_934),
    StatePopulation::new("DC", "District of Columbia", 646_449),
    StatePopulation::new("FL", "Florida", 20_271_272),
    StatePopulation::new("GA", "Georgia", 10_214_860),
    StatePopulation::new("HI", "Hawaii", 1_431_603),
    StatePopulation::new("ID", "Idaho", 1_654_930),
    StatePopulation::new("IL", "Illinois", 12_859_995),
    StatePopulation::new("IN", "Indiana", 6_619_680),
    StatePopulation::new("IA", "Iowa", 3_123_899),
    StatePopulation::new("KS", "Kansas", 2_911_641),
    StatePopulation::new("KY", "Kentucky", 4_425_092),
    StatePopulation::new("LA", "Louisiana", 4_670_724),
    StatePopulation::new("ME", "Maine", 1_329_328),
    StatePopulation::new("MD", "Maryland", 6_006_401),
    StatePopulation::new("MA", "Massachusetts", 6_794_422),
    StatePopulation::new("MI", "Michigan", 9_922_576),
    StatePopulation::new("MN", "Minnesota", 5_489_594),
    StatePopulation::new("MS", "Mississippi", 2_992_333),
    StatePopulation::new("MO", "Missouri", 6_083_672),
    StatePopulation::new("MT", "Montana", 1_032_949),
    StatePopulation::new("NE", "Nebraska", 1_896_190),
    StatePopulation::new("NV", "Nevada", 2_890_845),
    StatePopulation::new("NH", "New Hampshire", 1_330_608),
    StatePopulation::new("NJ", "New Jersey", 8_958_013),
    StatePopulation::new("NM", "New Mexico", 2_085_109),
    StatePopulation::new("NY", "New York", 19_795_791),
    StatePopulation::new("NC", "North Carolina", 10_042_802),
    StatePopulation::new("ND", "North Dakota", 756_927),
    StatePopulation::new("OH", "Ohio", 11_613_423),
    StatePopulation::new("OK", "Oklahoma", 3_911_338),
    StatePopulation::new("OR", "Oregon", 4_028_977),
    StatePopulation::new("PA", "Pennsylvania", 12_802_503),
    StatePopulation::new("RI", "Rhode Island", 1_056_298),
    StatePopulation::new("SC", "South Carolina", 4_896_146),
    StatePopulation::new("SD", "South Dakota", 858_469),
    StatePopulation::new("TN", "Tennessee", 6_600_299),
    StatePopulation::new("TX", "Texas", 27_469_114),
    StatePopulation::new("UT", "Utah", 2_995_919),
    StatePopulation::new("VT", "Vermont", 626_042),
    StatePopulation::new("VA", "Virginia", 8_382_993),
    StatePopulation::new("WA", "Washington", 7_170_351),
    StatePopulation::new("WV", "West Virginia", 1_844_128),
    StatePopulation::new("WI", "Wisconsin", 5_771_337),
    StatePopulation::new("WY", "Wyoming", 586_107),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{find_by_code, find_by_name};

    fn by_name(name: &str) -> Option<&'static StatePopulation> {
        find_by_name(STATE_POPULATIONS, name)
    }

    fn by_code(code: &str) -> Option<&'static StatePopulation> {
        find_by_code(STATE_POPULATIONS, code)
    }

    #[test]
    fn state_count() {
        assert_eq!(STATE_POPULATIONS.len(), STATE_COUNT);
    }

    #[test]
    fn sorted_by_name() {
        for pair in STATE_POPULATIONS.windows(2) {
            assert!(
                pair[0].name < pair[1].name,
                "{} should sort before {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in STATE_POPULATIONS.iter().enumerate() {
            for b in &STATE_POPULATIONS[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn name_code_roundtrip() {
        for state in STATE_POPULATIONS {
            assert_eq!(by_name(state.name), Some(state));
            assert_eq!(by_code(state.code), Some(state));
        }
    }

    #[test]
    fn case_insensitive_code() {
        assert_eq!(by_code("dc").map(|s| s.name), Some("District of Columbia"));
        assert_eq!(by_code("Ca").map(|s| s.population), Some(39_144_818));
    }

    #[test]
    fn unknown_lookups() {
        assert_eq!(by_name("Puerto Rico"), None);
        assert_eq!(by_code("PR"), None);
    }
}
