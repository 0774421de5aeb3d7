//! Offline gazetteer of well-known places.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;

use crate::domain::Coordinate;
use crate::provider::{Geocoder, ProviderError};

/// A named place with a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landmark {
    pub name: String,
    pub position: Coordinate,
}

impl Landmark {
    pub fn new(name: impl Into<String>, lng: f64, lat: f64) -> Self {
        Self {
            name: name.into(),
            position: Coordinate::new(lng, lat),
        }
    }
}

/// Resolves exact place names from a fixed list.
///
/// Matching is on the trimmed input; the city hint is ignored since the
/// list only covers one city.
#[derive(Debug, Clone, Default)]
pub struct LandmarkGeocoder {
    landmarks: Vec<Landmark>,
}

impl LandmarkGeocoder {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Scenic spots and district centres of Nanjing.
    pub fn nanjing() -> Self {
        const PLACES: [(&str, f64, f64); 19] = [
            ("中山陵", 118.838749, 32.060442),
            ("夫子庙", 118.786001, 32.022747),
            ("南京博物院", 118.820456, 32.042515),
            ("玄武湖", 118.795289, 32.075833),
            ("南京长江大桥", 118.736828, 32.115284),
            ("总统府", 118.794128, 32.045402),
            ("南京大屠杀纪念馆", 118.741441, 32.037962),
            ("老门东", 118.788841, 32.019951),
            ("玄武区", 118.797779, 32.048671),
            ("秦淮区", 118.79815, 32.011036),
            ("建邺区", 118.732688, 32.004456),
            ("鼓楼区", 118.76972, 32.06678),
            ("浦口区", 118.628005, 32.058797),
            ("栖霞区", 118.909939, 32.103986),
            ("雨花台区", 118.779777, 31.992257),
            ("江宁区", 118.839884, 31.944933),
            ("六合区", 118.841324, 32.342202),
            ("溧水区", 119.028722, 31.653066),
            ("高淳区", 118.875887, 31.327137),
        ];

        Self::new(
            PLACES
                .iter()
                .map(|(name, lng, lat)| Landmark::new(*name, *lng, *lat))
                .collect(),
        )
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Looks up a place by exact name.
    pub fn lookup(&self, name: &str) -> Option<Coordinate> {
        let name = name.trim();
        self.landmarks
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.position)
    }
}

impl Geocoder for LandmarkGeocoder {
    fn resolve<'a>(
        &'a self,
        text: &'a str,
        _city_hint: &'a str,
    ) -> BoxFuture<'a, Result<Option<Coordinate>, ProviderError>> {
        futures::future::ready(Ok(self.lookup(text))).boxed()
    }
}
