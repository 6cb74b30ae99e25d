pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::observation_builder::*;

pub mod observation_builder {

    use super::*;
    use crate::{geo::*, id::*, observation::*};

    #[derive(Debug)]
    pub struct ObservationRecordBuild {
        record: ObservationRecord,
    }

    impl ObservationRecordBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.record.id = id.into();
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.record.pos = Some(pos);
            self
        }
        pub fn without_pos(mut self) -> Self {
            self.record.pos = None;
            self
        }
        pub fn taxon_name(mut self, name: &str) -> Self {
            self.record.taxon_name = name.into();
            self
        }
        pub fn preferred_common_name(mut self, name: &str) -> Self {
            self.record.preferred_common_name = Some(name.into());
            self
        }
        pub fn english_common_name(mut self, name: &str) -> Self {
            self.record.english_common_name = Some(name.into());
            self
        }
        pub fn species_guess(mut self, guess: &str) -> Self {
            self.record.species_guess = Some(guess.into());
            self
        }
        pub fn photo(mut self, url: &str) -> Self {
            self.record.photos.push(Photo { url: url.into() });
            self
        }
        pub fn sound(mut self, url: &str) -> Self {
            self.record.sounds.push(Sound { url: url.into() });
            self
        }
        pub fn finish(self) -> ObservationRecord {
            self.record
        }
    }

    impl Builder for ObservationRecord {
        type Build = ObservationRecordBuild;
        fn build() -> ObservationRecordBuild {
            ObservationRecordBuild {
                record: ObservationRecord {
                    id: Id::from("1"),
                    pos: Some(MapPoint::from_lat_lng_deg(0.0, 0.0)),
                    taxon_name: "".into(),
                    preferred_common_name: None,
                    english_common_name: None,
                    species_guess: None,
                    photos: vec![],
                    sounds: vec![],
                    description: None,
                    place_guess: None,
                    user: Observer::default(),
                    created_at: None,
                    permalink: "".into(),
                },
            }
        }
    }
}
