//! Built-in drone profiles with manufacturer operating limits

use super::{
    TemperatureThreshold, VisibilityThreshold, WeatherLimits, WeatherThresholds,
    WindGustThreshold, WindSpeedThreshold,
};
use crate::units::{DistanceUnit, SpeedUnit, TemperatureUnit};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub image_url: Option<&'static str>,
    pub thresholds: WeatherThresholds,
}

/// Metric thresholds: temperature in °C, speeds in km/h, visibility in km
const fn limits(
    temperature: (f64, f64),
    wind_speed: f64,
    wind_gust: f64,
    visibility: f64,
    cloud_cover: f64,
    precipitation: f64,
) -> WeatherThresholds {
    WeatherThresholds {
        temperature: TemperatureThreshold {
            unit: TemperatureUnit::Celsius,
            min: temperature.0,
            max: temperature.1,
        },
        wind_speed: WindSpeedThreshold {
            unit: SpeedUnit::Kmh,
            max: wind_speed,
        },
        wind_gust: WindGustThreshold { max: wind_gust },
        visibility: VisibilityThreshold {
            unit: DistanceUnit::Kilometers,
            min: visibility,
        },
        weather: WeatherLimits {
            max_cloud_cover: cloud_cover,
            max_precipitation_probability: precipitation,
        },
    }
}

pub const DRONE_PROFILES: [DroneProfile; 18] = [
    DroneProfile {
        id: "dji-mini-2",
        name: "DJI Mini 2",
        manufacturer: "DJI",
        model: "Mini 2",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/cms/uploads/a1f1fe1b9bb4c96b5c44b1d9e3c8ac32.png",
        ),
        thresholds: limits((0.0, 40.0), 36.0, 38.0, 5.0, 90.0, 25.0),
    },
    DroneProfile {
        id: "dji-mini-3-pro",
        name: "DJI Mini 3 Pro",
        manufacturer: "DJI",
        model: "Mini 3 Pro",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/cms/uploads/6fd5f7f62f9a6a8f76e6cd4f6640c0c4.png",
        ),
        thresholds: limits((0.0, 40.0), 38.0, 40.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "dji-mavic-3",
        name: "DJI Mavic 3",
        manufacturer: "DJI",
        model: "Mavic 3",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/cms/uploads/7c4f1f1c4132f5b6bff3c92876d9231c.png",
        ),
        thresholds: limits((-10.0, 40.0), 43.0, 45.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "dji-air-2s",
        name: "DJI Air 2S",
        manufacturer: "DJI",
        model: "Air 2S",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/cms/uploads/1bfb5f5ce5186efe9d1ff3c9dd714945.png",
        ),
        thresholds: limits((-10.0, 40.0), 38.0, 40.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "dji-mini-4-pro",
        name: "DJI Mini 4 Pro",
        manufacturer: "DJI",
        model: "Mini 4 Pro",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/dps/0c5e97540d6f8c2d4d9e9b1c8cc0d675.png",
        ),
        thresholds: limits((-10.0, 40.0), 38.0, 40.0, 5.0, 90.0, 25.0),
    },
    DroneProfile {
        id: "dji-mavic-3-pro",
        name: "DJI Mavic 3 Pro",
        manufacturer: "DJI",
        model: "Mavic 3 Pro",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/dps/f1f81f83c13c813a8f00b47397ef1f51.png",
        ),
        thresholds: limits((-10.0, 40.0), 43.0, 45.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "autel-evo-lite-plus",
        name: "Autel EVO Lite+",
        manufacturer: "Autel Robotics",
        model: "EVO Lite+",
        image_url: Some("https://autelpilot.com/cdn/shop/products/EVO-Lite-orange.png"),
        thresholds: limits((-10.0, 40.0), 40.0, 42.0, 5.0, 90.0, 25.0),
    },
    DroneProfile {
        id: "skydio-2-plus",
        name: "Skydio 2+",
        manufacturer: "Skydio",
        model: "2+",
        image_url: Some(
            "https://assets.skydio.com/images/2plus/2plus-sport-kit-front-three-quarter.png",
        ),
        thresholds: limits((-10.0, 40.0), 40.0, 42.0, 5.0, 90.0, 20.0),
    },
    DroneProfile {
        id: "parrot-anafi-ai",
        name: "Parrot ANAFI Ai",
        manufacturer: "Parrot",
        model: "ANAFI Ai",
        image_url: Some("https://www.parrot.com/assets/s/2021/07/packshot-anafi-ai.png"),
        thresholds: limits((-10.0, 40.0), 46.0, 48.0, 5.0, 90.0, 35.0),
    },
    DroneProfile {
        id: "autel-evo-2-pro",
        name: "Autel EVO II Pro",
        manufacturer: "Autel Robotics",
        model: "EVO II Pro",
        image_url: Some("https://autelpilot.com/cdn/shop/products/EVO-II-Pro-orange.png"),
        thresholds: limits((-10.0, 40.0), 44.0, 46.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "dji-matrice-30t",
        name: "DJI Matrice 30T",
        manufacturer: "DJI Enterprise",
        model: "Matrice 30T",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/dps/67e20b0d5d6587faa2501b6e4a3f9e72.png",
        ),
        thresholds: limits((-20.0, 50.0), 54.0, 56.0, 3.0, 100.0, 50.0),
    },
    DroneProfile {
        id: "dji-inspire-3",
        name: "DJI Inspire 3",
        manufacturer: "DJI",
        model: "Inspire 3",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/dps/6e8989a4f91f8edcd11a31d4337be7d7.png",
        ),
        thresholds: limits((-20.0, 40.0), 47.0, 50.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "dji-phantom-4-rtk",
        name: "DJI Phantom 4 RTK",
        manufacturer: "DJI Enterprise",
        model: "Phantom 4 RTK",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/cms/uploads/7d3b0a8e30816c1472f6e835f3b9df08.png",
        ),
        thresholds: limits((-10.0, 40.0), 43.0, 45.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "autel-dragonfish",
        name: "Autel Dragonfish",
        manufacturer: "Autel Robotics",
        model: "Dragonfish",
        image_url: Some("https://autelpilot.com/cdn/shop/products/Dragonfish_Standard_45.png"),
        thresholds: limits((-20.0, 45.0), 50.0, 52.0, 4.0, 95.0, 40.0),
    },
    DroneProfile {
        id: "freefly-astro",
        name: "Freefly Astro",
        manufacturer: "Freefly Systems",
        model: "Astro",
        image_url: Some("https://freeflysystems.com/static/astro_hero.png"),
        thresholds: limits((-10.0, 40.0), 45.0, 47.0, 5.0, 90.0, 30.0),
    },
    DroneProfile {
        id: "yuneec-h520e",
        name: "Yuneec H520E",
        manufacturer: "Yuneec",
        model: "H520E",
        image_url: Some("https://yuneec.com/static/h520e_hero.png"),
        thresholds: limits((-20.0, 45.0), 46.0, 48.0, 4.0, 95.0, 35.0),
    },
    DroneProfile {
        id: "dji-agras-t40",
        name: "DJI Agras T40",
        manufacturer: "DJI Agriculture",
        model: "Agras T40",
        image_url: Some(
            "https://dji-official-fe.djicdn.com/dps/e4e1fdd0d338d1d3bd067aaa0551ad4f.png",
        ),
        thresholds: limits((-10.0, 45.0), 54.0, 56.0, 4.0, 100.0, 60.0),
    },
    DroneProfile {
        id: "skydio-x10",
        name: "Skydio X10",
        manufacturer: "Skydio",
        model: "X10",
        image_url: Some("https://assets.skydio.com/images/x10/x10-front-three-quarter.png"),
        thresholds: limits((-20.0, 45.0), 47.0, 49.0, 4.0, 95.0, 40.0),
    },
];

/// Look up a built-in profile by its id
#[must_use]
pub fn find_profile(id: &str) -> Option<&'static DroneProfile> {
    DRONE_PROFILES.iter().find(|profile| profile.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::validate;
    use std::collections::HashSet;

    #[test]
    fn test_profile_ids_are_unique() {
        let ids: HashSet<_> = DRONE_PROFILES.iter().map(|profile| profile.id).collect();
        assert_eq!(ids.len(), DRONE_PROFILES.len());
    }

    #[test]
    fn test_all_profiles_are_valid() {
        for profile in &DRONE_PROFILES {
            let report = validate(&profile.thresholds);
            assert!(report.is_valid, "{}: {:?}", profile.id, report.errors);
        }
    }

    #[test]
    fn test_find_profile() {
        let profile = find_profile("dji-mini-2").unwrap();
        assert_eq!(profile.name, "DJI Mini 2");
        assert_eq!(profile.thresholds.wind_speed.max, 36.0);
        assert_eq!(profile.thresholds.wind_gust.max, 38.0);
        assert_eq!(profile.thresholds.weather.max_precipitation_probability, 25.0);

        let matrice = find_profile("dji-matrice-30t").unwrap();
        assert_eq!(matrice.thresholds.temperature.min, -20.0);
        assert_eq!(matrice.thresholds.visibility.min, 3.0);

        assert!(find_profile("unknown-drone").is_none());
    }
}
