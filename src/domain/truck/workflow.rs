//! Truck status workflow engine
//!
//! One action applied to one truck produces a new status pair, the
//! event-specific timestamps, exactly one history entry and the
//! notification flag updates for the other role. Preconditions are
//! checked against the current `(statut, advanced_status)` pair; an
//! action applied out of order fails with `InvalidTransition` and leaves
//! the truck untouched.

use chrono::Utc;

use super::model::{Actor, AdvancedTruckStatus, Truck, TruckProducts, TruckStatus};
use crate::domain::{DomainError, DomainResult};

/// A workflow action performed by staff on a registered truck.
///
/// Registration itself is not an action: it creates the record
/// (see [`Truck::register`]).
#[derive(Debug, Clone, PartialEq)]
pub enum TruckAction {
    /// Manager records the analysis codes
    SubmitAnalysis { kor: String, th: String },
    /// Admin accepts the truck
    Validate,
    /// Admin refuses the truck, optionally with an annotation
    Refuse { comment: Option<String> },
    /// Manager sends a refused truck back for re-examination
    Resend,
    /// Admin puts a resent truck back into the decision queue
    Reintegrate,
    /// Manager records product data, finalizing acceptance
    AcceptFinal { products: TruckProducts },
    /// Manager marks unloading as finished
    MarkDischarged,
}

impl TruckAction {
    /// Role responsible for the action
    pub fn actor(&self) -> Actor {
        match self {
            Self::Validate | Self::Refuse { .. } | Self::Reintegrate => Actor::Admin,
            Self::SubmitAnalysis { .. }
            | Self::Resend
            | Self::AcceptFinal { .. }
            | Self::MarkDischarged => Actor::Gerant,
        }
    }

    /// Short action name used in errors and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitAnalysis { .. } => "submit_analysis",
            Self::Validate => "validate",
            Self::Refuse { .. } => "refuse",
            Self::Resend => "resend",
            Self::Reintegrate => "reintegrate",
            Self::AcceptFinal { .. } => "accept_final",
            Self::MarkDischarged => "mark_discharged",
        }
    }
}

fn invalid(action: &TruckAction, truck: &Truck) -> DomainError {
    DomainError::InvalidTransition {
        action: action.name(),
        from: truck.state_label(),
    }
}

/// Apply a workflow action to a truck in place.
///
/// Appends exactly one history entry on success. The caller is expected
/// to work on a copy and persist the whole record afterwards so a failed
/// write never leaves a half-applied transition behind.
pub fn apply(truck: &mut Truck, action: TruckAction) -> DomainResult<()> {
    let now = Utc::now();
    let by = action.actor();

    match &action {
        TruckAction::SubmitAnalysis { kor, th } => {
            if truck.statut != TruckStatus::Enregistre {
                return Err(invalid(&action, truck));
            }
            if kor.trim().is_empty() || th.trim().is_empty() {
                return Err(DomainError::Validation(
                    "kor and th are required to submit an analysis".to_string(),
                ));
            }
            truck.kor = Some(kor.trim().to_string());
            truck.th = Some(th.trim().to_string());
            truck.statut = TruckStatus::EnAttente;
            truck.push_history("Analyse soumise", by, now);
        }

        TruckAction::Validate => {
            if truck.statut != TruckStatus::EnAttente {
                return Err(invalid(&action, truck));
            }
            truck.statut = TruckStatus::Valide;
            truck.advanced_status = None;
            truck.validated_at = Some(now);
            truck.unread_for_gerant = true;
            truck.push_history("Camion validé", by, now);
        }

        TruckAction::Refuse { comment } => {
            if truck.statut != TruckStatus::EnAttente {
                return Err(invalid(&action, truck));
            }
            truck.statut = TruckStatus::Annule;
            truck.advanced_status = Some(AdvancedTruckStatus::RefuseEnAttenteGerant);
            truck.refused_at = Some(now);
            truck.unread_for_gerant = true;
            if let Some(comment) = comment {
                truck.comment = Some(comment.clone());
            }
            truck.push_history("Camion refusé", by, now);
        }

        TruckAction::Resend => {
            if truck.statut != TruckStatus::Annule
                || truck.advanced_status != Some(AdvancedTruckStatus::RefuseEnAttenteGerant)
            {
                return Err(invalid(&action, truck));
            }
            truck.advanced_status = Some(AdvancedTruckStatus::RefuseRenvoye);
            truck.renvoye_at = Some(now);
            truck.unread_for_admin = true;
            truck.push_history("Camion renvoyé pour réexamen", by, now);
        }

        TruckAction::Reintegrate => {
            if truck.statut != TruckStatus::Annule
                || truck.advanced_status != Some(AdvancedTruckStatus::RefuseRenvoye)
            {
                return Err(invalid(&action, truck));
            }
            truck.statut = TruckStatus::EnAttente;
            truck.advanced_status = Some(AdvancedTruckStatus::RefuseReintegre);
            truck.unread_for_gerant = true;
            truck.push_history("Camion réintégré", by, now);
        }

        TruckAction::AcceptFinal { products } => {
            if truck.statut != TruckStatus::Valide
                || truck.advanced_status == Some(AdvancedTruckStatus::AccepteFinal)
            {
                return Err(invalid(&action, truck));
            }
            if products.lot_number.trim().is_empty() {
                return Err(DomainError::Validation(
                    "lot_number is required for final acceptance".to_string(),
                ));
            }
            truck.advanced_status = Some(AdvancedTruckStatus::AccepteFinal);
            truck.final_accepted_at = Some(now);
            truck.products = Some(products.clone());
            truck.unread_for_admin = true;
            truck.push_history("Produits enregistrés, camion accepté", by, now);
        }

        TruckAction::MarkDischarged => {
            if truck.statut != TruckStatus::Valide
                || truck.advanced_status != Some(AdvancedTruckStatus::AccepteFinal)
            {
                return Err(invalid(&action, truck));
            }
            truck.statut = TruckStatus::Decharge;
            truck.decharge_at = Some(now);
            truck.unread_for_admin = true;
            truck.push_history("Déchargement terminé", by, now);
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::truck::model::{ReceptionStatus, TruckRegistration};
    use uuid::Uuid;

    fn registration() -> TruckRegistration {
        TruckRegistration {
            immatriculation: "AB-123-CD".to_string(),
            transporteur: "Acme".to_string(),
            transfert: String::new(),
            cooperative: String::new(),
        }
    }

    fn registered_truck() -> Truck {
        Truck::register(Uuid::new_v4(), registration(), ReceptionStatus::Enregistrer)
    }

    fn products() -> TruckProducts {
        TruckProducts {
            lot_number: "LOT-7".to_string(),
            bag_count: 120,
            gross_weight_kg: 9_600.0,
            net_weight_kg: 9_450.0,
        }
    }

    #[test]
    fn registration_creates_first_history_entry() {
        let truck = registered_truck();
        assert_eq!(truck.statut, TruckStatus::Enregistre);
        assert_eq!(truck.history.len(), 1);
        assert_eq!(truck.history[0].event, "Camion enregistré");
        assert_eq!(truck.history[0].by, Actor::Gerant);
        assert!(!truck.unread_for_admin);
        assert!(!truck.unread_for_gerant);
    }

    #[test]
    fn gate_refusal_lands_in_refoule() {
        let truck = Truck::register(Uuid::new_v4(), registration(), ReceptionStatus::Refouler);
        assert_eq!(truck.statut, TruckStatus::Refoule);
        assert_eq!(truck.history[0].event, "Camion refoulé à l'arrivée");
    }

    #[test]
    fn analysis_moves_to_en_attente_and_sets_codes() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();

        assert_eq!(truck.statut, TruckStatus::EnAttente);
        assert_eq!(truck.kor.as_deref(), Some("K1"));
        assert_eq!(truck.th.as_deref(), Some("T1"));
        assert_eq!(truck.history.len(), 2);
        // never skips ahead
        assert_ne!(truck.statut, TruckStatus::Valide);
    }

    #[test]
    fn analysis_requires_both_codes() {
        let mut truck = registered_truck();
        let err = apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "  ".to_string(),
            },
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(truck.statut, TruckStatus::Enregistre);
        assert_eq!(truck.history.len(), 1);
    }

    #[test]
    fn refuse_sets_substate_and_notifies_gerant() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(&mut truck, TruckAction::Refuse { comment: None }).unwrap();

        assert_eq!(truck.statut, TruckStatus::Annule);
        assert_eq!(
            truck.advanced_status,
            Some(AdvancedTruckStatus::RefuseEnAttenteGerant)
        );
        assert!(truck.unread_for_gerant);
        assert!(truck.refused_at.is_some());
        assert_eq!(truck.history.len(), 3);
    }

    #[test]
    fn refusing_a_validated_truck_is_rejected() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(&mut truck, TruckAction::Validate).unwrap();

        let err = apply(&mut truck, TruckAction::Refuse { comment: None }).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(truck.statut, TruckStatus::Valide);
        assert_eq!(truck.history.len(), 3);
    }

    #[test]
    fn full_refusal_round_trip() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(
            &mut truck,
            TruckAction::Refuse {
                comment: Some("KOR hors norme".to_string()),
            },
        )
        .unwrap();
        apply(&mut truck, TruckAction::Resend).unwrap();

        assert_eq!(truck.statut, TruckStatus::Annule);
        assert_eq!(truck.advanced_status, Some(AdvancedTruckStatus::RefuseRenvoye));
        assert!(truck.unread_for_admin);
        assert!(truck.renvoye_at.is_some());
        assert_eq!(truck.comment.as_deref(), Some("KOR hors norme"));

        apply(&mut truck, TruckAction::Reintegrate).unwrap();
        assert_eq!(truck.statut, TruckStatus::EnAttente);
        assert_eq!(
            truck.advanced_status,
            Some(AdvancedTruckStatus::RefuseReintegre)
        );
        assert_eq!(truck.history.len(), 5);
    }

    #[test]
    fn resend_requires_pending_refusal() {
        let mut truck = registered_truck();
        let err = apply(&mut truck, TruckAction::Resend).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn acceptance_then_discharge() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(&mut truck, TruckAction::Validate).unwrap();
        assert!(truck.unread_for_gerant);
        assert!(truck.validated_at.is_some());

        apply(
            &mut truck,
            TruckAction::AcceptFinal {
                products: products(),
            },
        )
        .unwrap();
        assert_eq!(truck.statut, TruckStatus::Valide);
        assert_eq!(truck.advanced_status, Some(AdvancedTruckStatus::AccepteFinal));
        assert!(truck.final_accepted_at.is_some());
        assert!(truck.unread_for_admin);
        assert_eq!(truck.products.as_ref().unwrap().bag_count, 120);

        apply(&mut truck, TruckAction::MarkDischarged).unwrap();
        assert_eq!(truck.statut, TruckStatus::Decharge);
        assert_eq!(truck.advanced_status, Some(AdvancedTruckStatus::AccepteFinal));
        assert!(truck.decharge_at.is_some());
        assert_eq!(truck.history.len(), 5);
    }

    #[test]
    fn double_acceptance_is_rejected() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(&mut truck, TruckAction::Validate).unwrap();
        apply(
            &mut truck,
            TruckAction::AcceptFinal {
                products: products(),
            },
        )
        .unwrap();

        let err = apply(
            &mut truck,
            TruckAction::AcceptFinal {
                products: products(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn discharge_requires_final_acceptance() {
        let mut truck = registered_truck();
        apply(
            &mut truck,
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
        )
        .unwrap();
        apply(&mut truck, TruckAction::Validate).unwrap();

        let err = apply(&mut truck, TruckAction::MarkDischarged).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn history_grows_by_exactly_one_per_action() {
        let mut truck = registered_truck();
        let actions = [
            TruckAction::SubmitAnalysis {
                kor: "K1".to_string(),
                th: "T1".to_string(),
            },
            TruckAction::Validate,
            TruckAction::AcceptFinal {
                products: products(),
            },
            TruckAction::MarkDischarged,
        ];

        for (i, action) in actions.into_iter().enumerate() {
            apply(&mut truck, action).unwrap();
            assert_eq!(truck.history.len(), i + 2);
        }
    }

    #[test]
    fn mark_seen_clears_only_own_flag() {
        let mut truck = registered_truck();
        truck.unread_for_admin = true;
        truck.unread_for_gerant = true;

        truck.mark_seen(Actor::Admin);
        assert!(!truck.unread_for_admin);
        assert!(truck.unread_for_gerant);

        // idempotent
        truck.mark_seen(Actor::Admin);
        assert!(!truck.unread_for_admin);
    }
}
