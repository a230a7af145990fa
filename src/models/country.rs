// src/models/country.rs

// Catálogo de países atendidos. Usado pelo seed para buscar as fronteiras.
#[derive(Debug, Clone, Copy)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    /// [longitude, latitude]
    pub center: [f64; 2],
    pub zoom: f64,
    /// ID do lugar na API de fronteiras da Geoapify
    pub place_id: &'static str,
}

pub const COUNTRIES: &[Country] = &[
    Country {
        code: "PS",
        name: "Gaza City",
        center: [34.4667, 31.5017],
        zoom: 11.5,
        place_id: "5194a103642b3b4140595c14557089813f40f00101f901f08ba00000000000c00206920306d8bad8b2d8a9",
    },
    Country {
        code: "QA",
        name: "Qatar",
        center: [51.531, 25.2867],
        zoom: 7.0,
        place_id: "51079811698a9d4940594c952eaef1713940f00101f901c7a7040000000000c0020b920306d982d8b7d8b1",
    },
    Country {
        code: "EG",
        name: "Egypt",
        center: [30.8025, 26.8206],
        zoom: 5.8,
        place_id: "51ac66cef5c99e3d4059defcd7bb3fe83a40f00101f9019b7d160000000000c0020b920306d985d8b5d8b1",
    },
    Country {
        code: "SD",
        name: "Sudan",
        center: [30.2176, 12.8628],
        zoom: 5.0,
        place_id: "51a084835b8ecb3d4059eaad832051e82e40f00101f90115f1020000000000c0020b92030ed8a7d984d8b3d988d8afd8a7d986",
    },
    Country {
        code: "YE",
        name: "Yemen",
        center: [47.6062, 15.5527],
        zoom: 6.0,
        place_id: "51861c250bfa9f4740596c278dd6ac622f40f00101f901c4a7040000000000c0020b92030ad8a7d984d98ad985d986",
    },
    Country {
        code: "LY",
        name: "Libya",
        center: [17.2283, 26.3351],
        zoom: 5.0,
        place_id: "51aab83460a64d314059e261eb39e96b3a40f00101f901f6f0020000000000c0020b92030ad984d98ad8a8d98ad8a7",
    },
    Country {
        code: "SA",
        name: "Saudi Arabia",
        center: [45.0792, 23.8859],
        zoom: 5.0,
        place_id: "51ae4770b33c29464059c68ab001b6373840f00101f90180b1040000000000c0020b920310d8a7d984d8b3d8b9d988d8afd98ad8a9",
    },
];

pub fn find_country(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}
