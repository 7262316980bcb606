//! Tab filter / query layer
//!
//! Pure functions over truck slices: no mutation, safe to recompute on
//! every keystroke or tab change. Period predicates are evaluated against
//! `created_at` (local calendar day for `today`, rolling windows
//! otherwise).

use chrono::{DateTime, Duration, Local, Utc};
use serde::Deserialize;

use super::model::{AdvancedTruckStatus, Truck, TruckStatus};

/// Dashboard tab selecting a status/sub-state combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckTab {
    All,
    Enregistres,
    EnAttente,
    Valides,
    Refuses,
    Renvoyes,
    Acceptes,
    Decharges,
    Refoules,
}

impl Default for TruckTab {
    fn default() -> Self {
        Self::All
    }
}

impl From<&str> for TruckTab {
    fn from(s: &str) -> Self {
        match s {
            "enregistres" => Self::Enregistres,
            "en_attente" => Self::EnAttente,
            "valides" => Self::Valides,
            "refuses" => Self::Refuses,
            "renvoyes" => Self::Renvoyes,
            "acceptes" => Self::Acceptes,
            "decharges" => Self::Decharges,
            "refoules" => Self::Refoules,
            _ => Self::All,
        }
    }
}

impl TruckTab {
    pub fn matches(&self, truck: &Truck) -> bool {
        match self {
            Self::All => true,
            Self::Enregistres => truck.statut == TruckStatus::Enregistre,
            Self::EnAttente => truck.statut == TruckStatus::EnAttente,
            Self::Valides => {
                truck.statut == TruckStatus::Valide
                    && truck.advanced_status != Some(AdvancedTruckStatus::AccepteFinal)
            }
            Self::Refuses => truck.statut == TruckStatus::Annule,
            Self::Renvoyes => truck.advanced_status == Some(AdvancedTruckStatus::RefuseRenvoye),
            // sub-state wins over statut: an accepted truck stays in this
            // tab after discharge
            Self::Acceptes => truck.advanced_status == Some(AdvancedTruckStatus::AccepteFinal),
            Self::Decharges => truck.statut == TruckStatus::Decharge,
            Self::Refoules => truck.statut == TruckStatus::Refoule,
        }
    }
}

/// Period filter, evaluated against `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodFilter {
    All,
    Today,
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
}

impl Default for PeriodFilter {
    fn default() -> Self {
        Self::All
    }
}

impl From<&str> for PeriodFilter {
    fn from(s: &str) -> Self {
        match s {
            "today" => Self::Today,
            "7days" => Self::Last7Days,
            "30days" => Self::Last30Days,
            _ => Self::All,
        }
    }
}

impl PeriodFilter {
    pub fn matches(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            // local calendar day, not a 24h window
            Self::Today => {
                created_at.with_timezone(&Local).date_naive()
                    == now.with_timezone(&Local).date_naive()
            }
            Self::Last7Days => created_at >= now - Duration::days(7),
            Self::Last30Days => created_at >= now - Duration::days(30),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckOrder {
    /// As stored (registration order)
    Insertion,
    /// Most recent first, for history views
    NewestFirst,
}

impl Default for TruckOrder {
    fn default() -> Self {
        Self::Insertion
    }
}

/// Combined filter over a truck collection
#[derive(Debug, Clone, Default)]
pub struct TruckQuery {
    pub tab: TruckTab,
    pub search: Option<String>,
    pub period: PeriodFilter,
    pub statut: Option<TruckStatus>,
    pub order: TruckOrder,
}

impl TruckQuery {
    fn matches(&self, truck: &Truck, now: DateTime<Utc>) -> bool {
        if !self.tab.matches(truck) {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let haystack = format!(
                    "{} {} {} {}",
                    truck.immatriculation, truck.transporteur, truck.transfert, truck.cooperative
                )
                .to_lowercase();
                if !haystack.contains(&needle) {
                    return false;
                }
            }
        }

        if let Some(statut) = self.statut {
            if truck.statut != statut {
                return false;
            }
        }

        self.period.matches(truck.created_at, now)
    }

    /// Apply the filter, preserving or re-ordering per `order`.
    pub fn apply(&self, trucks: Vec<Truck>) -> Vec<Truck> {
        let now = Utc::now();
        let mut out: Vec<Truck> = trucks
            .into_iter()
            .filter(|t| self.matches(t, now))
            .collect();

        if self.order == TruckOrder::NewestFirst {
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        out
    }
}

/// Per-warehouse dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarehouseTruckStats {
    pub total: usize,
    pub enregistres: usize,
    pub en_attente: usize,
    pub valides_en_cours: usize,
    pub acceptes: usize,
    pub decharges: usize,
    pub annules: usize,
    pub refoules: usize,
    pub unread_for_admin: usize,
    pub unread_for_gerant: usize,
}

impl WarehouseTruckStats {
    pub fn compute(trucks: &[Truck]) -> Self {
        let mut stats = Self {
            total: trucks.len(),
            ..Self::default()
        };

        for t in trucks {
            match t.statut {
                TruckStatus::Enregistre => stats.enregistres += 1,
                TruckStatus::EnAttente => stats.en_attente += 1,
                TruckStatus::Valide => {
                    if t.advanced_status != Some(AdvancedTruckStatus::AccepteFinal) {
                        stats.valides_en_cours += 1;
                    }
                }
                TruckStatus::Decharge => stats.decharges += 1,
                TruckStatus::Annule => stats.annules += 1,
                TruckStatus::Refoule => stats.refoules += 1,
            }
            if t.advanced_status == Some(AdvancedTruckStatus::AccepteFinal) {
                stats.acceptes += 1;
            }
            if t.unread_for_admin {
                stats.unread_for_admin += 1;
            }
            if t.unread_for_gerant {
                stats.unread_for_gerant += 1;
            }
        }

        stats
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::truck::model::{ReceptionStatus, TruckRegistration};
    use crate::domain::truck::workflow::{apply, TruckAction};
    use crate::domain::truck::TruckProducts;
    use uuid::Uuid;

    fn truck(immatriculation: &str, transporteur: &str) -> Truck {
        Truck::register(
            Uuid::new_v4(),
            TruckRegistration {
                immatriculation: immatriculation.to_string(),
                transporteur: transporteur.to_string(),
                transfert: String::new(),
                cooperative: "CoopSud".to_string(),
            },
            ReceptionStatus::Enregistrer,
        )
    }

    fn accepted_truck() -> Truck {
        let mut t = truck("GH-789-IJ", "TransNord");
        apply(
            &mut t,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(&mut t, TruckAction::Validate).unwrap();
        apply(
            &mut t,
            TruckAction::AcceptFinal {
                products: TruckProducts {
                    lot_number: "LOT-1".to_string(),
                    bag_count: 10,
                    gross_weight_kg: 800.0,
                    net_weight_kg: 780.0,
                },
            },
        )
        .unwrap();
        t
    }

    #[test]
    fn acceptes_tab_selects_on_substate_regardless_of_statut() {
        let mut discharged = accepted_truck();
        apply(&mut discharged, TruckAction::MarkDischarged).unwrap();
        let accepted = accepted_truck();
        let pending = truck("AB-123-CD", "Acme");

        let query = TruckQuery {
            tab: TruckTab::Acceptes,
            ..TruckQuery::default()
        };
        let out = query.apply(vec![discharged.clone(), accepted.clone(), pending]);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.advanced_status
            == Some(AdvancedTruckStatus::AccepteFinal)));
        // one of them is Déchargé, still included
        assert!(out.iter().any(|t| t.statut == TruckStatus::Decharge));
    }

    #[test]
    fn valides_tab_excludes_finally_accepted() {
        let mut validated = truck("AB-123-CD", "Acme");
        apply(
            &mut validated,
            TruckAction::SubmitAnalysis {
                kor: "K".to_string(),
                th: "T".to_string(),
            },
        )
        .unwrap();
        apply(&mut validated, TruckAction::Validate).unwrap();

        let query = TruckQuery {
            tab: TruckTab::Valides,
            ..TruckQuery::default()
        };
        let out = query.apply(vec![validated, accepted_truck()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].immatriculation, "AB-123-CD");
    }

    #[test]
    fn search_is_case_insensitive_over_all_descriptive_fields() {
        let a = truck("AB-123-CD", "Acme Transport");
        let b = truck("EF-456-GH", "Nordic");

        let query = TruckQuery {
            search: Some("acme".to_string()),
            ..TruckQuery::default()
        };
        let out = query.apply(vec![a.clone(), b.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].immatriculation, "AB-123-CD");

        // cooperative participates in the haystack
        let query = TruckQuery {
            search: Some("coopsud".to_string()),
            ..TruckQuery::default()
        };
        assert_eq!(query.apply(vec![a, b]).len(), 2);
    }

    #[test]
    fn today_excludes_yesterday() {
        let recent = truck("AB-123-CD", "Acme");
        let mut old = truck("EF-456-GH", "Nordic");
        old.created_at = Utc::now() - Duration::hours(25);

        let query = TruckQuery {
            period: PeriodFilter::Today,
            ..TruckQuery::default()
        };
        let out = query.apply(vec![recent, old]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].immatriculation, "AB-123-CD");
    }

    #[test]
    fn rolling_windows_measure_from_now() {
        let mut eight_days = truck("AA-000-AA", "A");
        eight_days.created_at = Utc::now() - Duration::days(8);
        let mut two_days = truck("BB-111-BB", "B");
        two_days.created_at = Utc::now() - Duration::days(2);

        let week = TruckQuery {
            period: PeriodFilter::Last7Days,
            ..TruckQuery::default()
        };
        let out = week.apply(vec![eight_days.clone(), two_days.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].immatriculation, "BB-111-BB");

        let month = TruckQuery {
            period: PeriodFilter::Last30Days,
            ..TruckQuery::default()
        };
        assert_eq!(month.apply(vec![eight_days, two_days]).len(), 2);
    }

    #[test]
    fn newest_first_sorts_by_created_at() {
        let mut older = truck("AA-000-AA", "A");
        older.created_at = Utc::now() - Duration::hours(3);
        let newer = truck("BB-111-BB", "B");

        let query = TruckQuery {
            order: TruckOrder::NewestFirst,
            ..TruckQuery::default()
        };
        let out = query.apply(vec![older, newer]);
        assert_eq!(out[0].immatriculation, "BB-111-BB");
        assert_eq!(out[1].immatriculation, "AA-000-AA");
    }

    #[test]
    fn insertion_order_is_preserved_by_default() {
        let a = truck("AA-000-AA", "A");
        let b = truck("BB-111-BB", "B");
        let out = TruckQuery::default().apply(vec![a, b]);
        assert_eq!(out[0].immatriculation, "AA-000-AA");
    }

    #[test]
    fn stats_count_states_and_unread_flags() {
        let mut refused = truck("AA-000-AA", "A");
        apply(
            &mut refused,
            TruckAction::SubmitAnalysis {
                kor: "K".to_string(),
                th: "T".to_string(),
            },
        )
        .unwrap();
        apply(&mut refused, TruckAction::Refuse { comment: None }).unwrap();

        let trucks = vec![refused, accepted_truck(), truck("CC-222-CC", "C")];
        let stats = WarehouseTruckStats::compute(&trucks);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.enregistres, 1);
        assert_eq!(stats.annules, 1);
        assert_eq!(stats.acceptes, 1);
        assert_eq!(stats.valides_en_cours, 0);
        assert_eq!(stats.unread_for_gerant, 1);
        assert_eq!(stats.unread_for_admin, 1);
    }
}
