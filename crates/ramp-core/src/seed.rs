//! The built-in seed set: points that are present whatever location is
//! searched. Seed points are never mutated in place; a mutation materialises
//! an overlay copy with the same id, which shadows the seed entry.

use crate::point::{AccessibilityPoint, PointId, PointKind, Position};

/// An immutable list of baseline points.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
  points: Vec<AccessibilityPoint>,
}

impl SeedSet {
  /// Build a seed set from arbitrary points. Later duplicates of an id are
  /// dropped so the set stays keyed by id.
  pub fn from_points(points: impl IntoIterator<Item = AccessibilityPoint>) -> Self {
    let mut unique: Vec<AccessibilityPoint> = Vec::new();
    for p in points {
      if !unique.iter().any(|u| u.id == p.id) {
        unique.push(p);
      }
    }
    Self { points: unique }
  }

  /// The points shipped with the service.
  pub fn builtin() -> Self {
    Self::from_points([
      seed(
        "default-1",
        "Accessible Restroom - Lagoa do Taquaral",
        "Av. Dr. Heitor Penteado, s/n - Taquaral, Campinas - SP",
        PointKind::Restroom,
        "Public accessible restroom next to the main gate of Parque Portugal.",
        -22.8797,
        -47.0505,
      ),
      seed(
        "default-2",
        "Access Ramp - Mercado Municipal",
        "Av. Benjamin Constant, s/n - Centro, Campinas - SP",
        PointKind::Ramp,
        "Main access ramp at the Avenida Benjamin Constant entrance to the market.",
        -22.9054,
        -47.0634,
      ),
      seed(
        "default-3",
        "Central Elevator - Iguatemi Campinas",
        "Av. Iguatemi, 777 - Vila Brandina, Campinas - SP",
        PointKind::Elevator,
        "Panoramic elevator serving every floor, beside the main food court.",
        -22.8953,
        -47.0232,
      ),
      seed(
        "default-4",
        "Accessible Parking - Campinas City Hall",
        "Av. Anchieta, 200 - Centro, Campinas - SP",
        PointKind::Parking,
        "Reserved parking spaces for people with disabilities in front of the Paço Municipal.",
        -22.9032,
        -47.0583,
      ),
      seed(
        "default-5",
        "Accessible Entrance - Teatro Castro Mendes",
        "Rua Conselheiro Gomide, 62 - Vila Industrial, Campinas - SP",
        PointKind::Entrance,
        "Step-free main entrance with wide doors for wheelchair access.",
        -22.9110,
        -47.0760,
      ),
    ])
  }

  pub fn get(&self, id: &PointId) -> Option<&AccessibilityPoint> {
    self.points.iter().find(|p| &p.id == id)
  }

  pub fn points(&self) -> &[AccessibilityPoint] { &self.points }

  pub fn len(&self) -> usize { self.points.len() }

  pub fn is_empty(&self) -> bool { self.points.is_empty() }
}

fn seed(
  id: &'static str,
  name: &'static str,
  address: &'static str,
  kind: PointKind,
  description: &'static str,
  lat: f64,
  lng: f64,
) -> AccessibilityPoint {
  AccessibilityPoint {
    // Seed ids are non-empty literals.
    id: PointId::from_static(id),
    name: name.to_owned(),
    address: address.to_owned(),
    kind,
    description: description.to_owned(),
    position: Position { lat, lng },
    creator_id: None,
    custom_icon: None,
    ratings: Vec::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_has_five_valid_points() {
    let seed = SeedSet::builtin();
    assert_eq!(seed.len(), 5);
    assert!(seed.points().iter().all(|p| p.creator_id.is_none()));
    assert!(seed.points().iter().all(|p| p.position.validate().is_ok()));
    assert!(seed.get(&PointId::new("default-3").unwrap()).is_some());
  }

  #[test]
  fn from_points_keeps_first_of_duplicate_ids() {
    let mut a = SeedSet::builtin().points()[0].clone();
    let mut b = a.clone();
    a.name = "first".into();
    b.name = "second".into();
    let seed = SeedSet::from_points([a, b]);
    assert_eq!(seed.len(), 1);
    assert_eq!(seed.points()[0].name, "first");
  }
}
