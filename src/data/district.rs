//! Static district data for the IPMA location selector
//!
//! The site groups localities under these districts (mainland) and islands
//! (Madeira and the Azores). Labels match the dropdown text exactly,
//! accents and capitalisation included.

/// Every district label the site offers in its `district` dropdown
pub static DISTRICTS: [&str; 29] = [
    "Aveiro",
    "Beja",
    "Braga",
    "Bragança",
    "Castelo Branco",
    "Coimbra",
    "Évora",
    "Faro",
    "Guarda",
    "Leiria",
    "Lisboa",
    "Portalegre",
    "Porto",
    "Santarém",
    "Setúbal",
    "Viana do Castelo",
    "Vila Real",
    "Viseu",
    "Madeira",
    "Porto Santo",
    "Santa Maria",
    "São Miguel",
    "Terceira",
    "Graciosa",
    "São Jorge",
    "Pico",
    "Faial",
    "Flores",
    "Corvo",
];

/// Checks exact membership in the allow-list
///
/// No case folding: "coimbra" is rejected, "Coimbra" is accepted.
pub fn is_allowed_district(district: &str) -> bool {
    DISTRICTS.contains(&district)
}
