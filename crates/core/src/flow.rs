//! The sequential form-flow controller.
//!
//! After a service's data has been accepted, the controller decides what the
//! patient sees next: the form for the next service in the traversal order,
//! or — once the end of the order is reached — the patient summary. The
//! controller computes a routing decision only; it performs no persistence
//! and no redirects itself.

use std::sync::Arc;

use materna_types::PersonalNumber;

use crate::catalog::ServiceCatalog;
use crate::constants::REGISTRATION_SERVICE;
use crate::error::{RecordError, RecordResult};

/// The routing decision produced by [`FlowController::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowStep {
    /// Present the form for `service`, carrying the same personal number.
    NextForm {
        service: String,
        personal_number: PersonalNumber,
    },
    /// The traversal is complete; present the patient summary.
    Summary { personal_number: PersonalNumber },
}

/// Decides where the workflow goes after each accepted submission.
///
/// Deterministic given the injected catalog: for the same current service and
/// personal number, `advance` always produces the same step.
#[derive(Clone, Debug)]
pub struct FlowController {
    catalog: Arc<ServiceCatalog>,
}

impl FlowController {
    /// Creates a controller over the given catalog.
    pub fn new(catalog: Arc<ServiceCatalog>) -> Self {
        Self { catalog }
    }

    /// Computes the step that follows `current` for this patient.
    ///
    /// `current` is either the registration entry point or a member of the
    /// traversal order. Registration routes to the first ordered service;
    /// an ordered service routes to its successor; the last ordered service
    /// routes to the summary.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownService`] if `current` is neither the
    /// registration entry point nor a member of the traversal order. Routing
    /// an unrecognised service to the first form would silently restart the
    /// pathway, so it is rejected instead.
    pub fn advance(
        &self,
        current: &str,
        personal_number: PersonalNumber,
    ) -> RecordResult<FlowStep> {
        let order = self.catalog.traversal_order();

        let next_index = if current == REGISTRATION_SERVICE {
            0
        } else {
            match order.iter().position(|service| *service == current) {
                Some(index) => index + 1,
                None => return Err(RecordError::UnknownService(current.to_string())),
            }
        };

        match order.get(next_index) {
            Some(service) => Ok(FlowStep::NextForm {
                service: (*service).to_string(),
                personal_number,
            }),
            None => Ok(FlowStep::Summary { personal_number }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FlowController {
        FlowController::new(Arc::new(ServiceCatalog::standard()))
    }

    fn pn() -> PersonalNumber {
        PersonalNumber::new("P123").expect("valid personal number")
    }

    #[test]
    fn registration_routes_to_the_first_ordered_service() {
        let step = controller()
            .advance(REGISTRATION_SERVICE, pn())
            .expect("advance should succeed");

        assert_eq!(
            step,
            FlowStep::NextForm {
                service: "MidwifeNotes".to_string(),
                personal_number: pn(),
            }
        );
    }

    #[test]
    fn every_non_terminal_service_routes_to_its_successor() {
        let flow = controller();
        let catalog = ServiceCatalog::standard();
        let order = catalog.traversal_order();

        for window in order.windows(2) {
            let step = flow
                .advance(window[0], pn())
                .expect("advance should succeed");
            assert_eq!(
                step,
                FlowStep::NextForm {
                    service: window[1].to_string(),
                    personal_number: pn(),
                },
                "{} should route to {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn the_last_service_routes_to_the_summary() {
        let catalog = ServiceCatalog::standard();
        let last = *catalog
            .traversal_order()
            .last()
            .expect("order should not be empty");

        let step = controller().advance(last, pn()).expect("advance should succeed");

        assert_eq!(
            step,
            FlowStep::Summary {
                personal_number: pn()
            }
        );
    }

    #[test]
    fn a_service_outside_the_pathway_is_rejected() {
        // Falling back to the first form would silently restart the pathway
        // for a malformed input, so advance rejects it instead.
        let err = controller()
            .advance("Cardiology", pn())
            .expect_err("unknown service should be rejected");

        assert!(matches!(err, RecordError::UnknownService(name) if name == "Cardiology"));
    }

    #[test]
    fn advance_preserves_the_personal_number() {
        let personal_number = PersonalNumber::new("19851203-0007").expect("valid personal number");
        let step = controller()
            .advance("Ultrasound", personal_number.clone())
            .expect("advance should succeed");

        match step {
            FlowStep::NextForm {
                personal_number: carried,
                ..
            } => assert_eq!(carried, personal_number),
            FlowStep::Summary { .. } => panic!("Ultrasound is not the last service"),
        }
    }
}
