use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Department capitals with their average daily peak sun hours (HSP).
const COLOMBIAN_CAPITALS: &[(&str, f64)] = &[
    ("Leticia", 4.2),
    ("Medellín", 4.2),
    ("Arauca", 5.0),
    ("Barranquilla", 5.5),
    ("Bogotá", 4.1),
    ("Bucaramanga", 4.5),
    ("Cali", 4.8),
    ("Cartagena", 5.4),
    ("Florencia", 3.8),
    ("Inírida", 4.5),
    ("Mocoa", 3.5),
    ("Neiva", 4.9),
    ("Montería", 5.1),
    ("Pasto", 4.2),
    ("Pereira", 4.0),
    ("Popayán", 4.1),
    ("Puerto Carreño", 5.8),
    ("Quibdó", 3.2),
    ("Riohacha", 6.1),
    ("San Andrés", 5.7),
    ("San José del Guaviare", 4.2),
    ("Santa Marta", 5.6),
    ("Sincelejo", 5.0),
    ("Mitú", 4.0),
    ("Ibagué", 4.6),
    ("Tunja", 4.3),
    ("Villavicencio", 4.1),
    ("Yopal", 4.8),
    ("Valledupar", 5.6),
    ("Manizales", 3.9),
    ("Cúcuta", 5.2),
    ("Puerto Inírida", 4.5),
];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationProfile {
    pub name: String,
    /// Average daily peak sun hours (h/day)
    pub peak_sun_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location name is empty")]
    EmptyName,
    #[error("duplicate location: {0}")]
    Duplicate(String),
    #[error("peak sun hours for {name} must be positive and finite, found {value}")]
    InvalidPeakSunHours { name: String, value: f64 },
}

/// Immutable city → radiation lookup. "No selection" is not an entry: callers
/// hold an `Option` and the table only ever answers for real places.
#[derive(Debug, Clone)]
pub struct LocationTable {
    entries: Vec<LocationProfile>,
}

impl LocationTable {
    pub fn new(entries: Vec<LocationProfile>) -> Result<Self, LocationError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(LocationError::EmptyName);
            }
            if !entry.peak_sun_hours.is_finite() || entry.peak_sun_hours <= 0.0 {
                return Err(LocationError::InvalidPeakSunHours {
                    name: entry.name.clone(),
                    value: entry.peak_sun_hours,
                });
            }
            if entries[..index].iter().any(|other| same_name(&other.name, &entry.name)) {
                return Err(LocationError::Duplicate(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in table of Colombian capitals, checked like any other table.
    pub fn colombia() -> Result<Self, LocationError> {
        let entries = COLOMBIAN_CAPITALS
            .iter()
            .map(|&(name, peak_sun_hours)| LocationProfile { name: name.to_string(), peak_sun_hours })
            .collect();
        Self::new(entries)
    }

    /// Case- and whitespace-tolerant lookup by city name.
    pub fn find(&self, name: &str) -> Option<&LocationProfile> {
        self.entries.iter().find(|entry| same_name(&entry.name, name))
    }

    pub fn all(&self) -> &[LocationProfile] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_passes_validation() {
        let table = LocationTable::colombia().unwrap();
        assert_eq!(table.len(), 32);
        assert!(table.all().iter().all(|l| (3.0..=6.5).contains(&l.peak_sun_hours)));
    }

    #[test]
    fn test_find_is_tolerant() {
        let table = LocationTable::colombia().unwrap();
        assert_eq!(table.find("Bogotá").map(|l| l.peak_sun_hours), Some(4.1));
        assert_eq!(table.find("  bogotá ").map(|l| l.name.as_str()), Some("Bogotá"));
        assert_eq!(table.find("RIOHACHA").map(|l| l.peak_sun_hours), Some(6.1));
    }

    #[test]
    fn test_no_selection_sentinel() {
        let table = LocationTable::colombia().unwrap();
        assert!(table.find("Seleccionar").is_none());
        assert!(table.find("").is_none());
        assert!(table.find("Lima").is_none());
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let zero = vec![LocationProfile { name: "Nowhere".into(), peak_sun_hours: 0.0 }];
        assert!(matches!(LocationTable::new(zero), Err(LocationError::InvalidPeakSunHours { .. })));

        let dup = vec![
            LocationProfile { name: "Cali".into(), peak_sun_hours: 4.8 },
            LocationProfile { name: "cali".into(), peak_sun_hours: 4.9 },
        ];
        assert_eq!(LocationTable::new(dup).unwrap_err(), LocationError::Duplicate("cali".into()));

        let unnamed = vec![LocationProfile { name: " ".into(), peak_sun_hours: 4.0 }];
        assert_eq!(LocationTable::new(unnamed).unwrap_err(), LocationError::EmptyName);
    }
}
