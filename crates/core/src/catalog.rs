//! The service catalog: every form in the maternity care pathway.
//!
//! The catalog is a static, ordered table mapping each service name to the
//! ordered list of field names its form collects, plus the fixed traversal
//! order a patient walks through after registration. It is built once at
//! process startup and injected into the services that need it — nothing in
//! the codebase reaches for it as ambient global state.

use crate::constants::REGISTRATION_SERVICE;

/// One service in the catalog: a name and the ordered fields its form collects.
#[derive(Clone, Copy, Debug)]
pub struct ServiceDefinition {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

const DEFINITIONS: &[ServiceDefinition] = &[
    ServiceDefinition {
        name: REGISTRATION_SERVICE,
        fields: &[
            "PersonalNumber",
            "FirstName",
            "LastName",
            "DateOfBirth",
            "Gender",
            "ContactNumber",
            "Email",
            "Address",
            "Allergies",
            "PreviousConditions",
            "InsuranceProvider",
            "InsuranceNumber",
            "EmergencyContact",
            "EmergencyContactNo",
            "BloodGroup",
        ],
    },
    ServiceDefinition {
        name: "MidwifeNotes",
        fields: &["Time", "MidwifeNote", "DayNote", "Discharge", "MaternityReport"],
    },
    ServiceDefinition {
        name: "LaborProgressChart",
        fields: &[
            "PersonalNumber",
            "Name",
            "WomensClinic",
            "TimeOfLabor",
            "CervicalDilation",
            "FetalHeartRate",
            "Contractions",
        ],
    },
    ServiceDefinition {
        name: "DeliverySummary",
        fields: &[
            "PersonalNumber",
            "Name",
            "Facility",
            "DateOfBirth",
            "DeliveryMethod",
            "BirthWeight",
            "ApgarScore",
            "HeadCircumference",
            "Length",
        ],
    },
    ServiceDefinition {
        name: "LabResults",
        fields: &[
            "SerumFerritin",
            "SensitiveTSH",
            "FreeThyroxine",
            "Hepatitis",
            "HIV",
            "ImmunizationTest",
            "RhFactor",
            "Rubella",
            "SyphilisTest",
        ],
    },
    ServiceDefinition {
        name: "UltrasoundSummary",
        fields: &[
            "Date",
            "GestationalAge",
            "FetalHeartRate",
            "AmnioticFluid",
            "EstimatedDelivery",
            "BiparietalDiameter",
            "AbdominalDiameter",
            "FemurLength",
        ],
    },
    ServiceDefinition {
        name: "DischargeSummary",
        fields: &[
            "Date",
            "DischargeTime",
            "HemoglobinLevel",
            "BloodReceived",
            "RecommendedFollowUp",
            "WoundHealed",
        ],
    },
    ServiceDefinition {
        name: "MaternityReport",
        fields: &[
            "DeliveryMethod",
            "ApgarScore",
            "BirthWeight",
            "HeadCircumference",
            "Length",
            "NeonatalCondition",
            "Breastfeeding",
            "FollowUp",
        ],
    },
    ServiceDefinition {
        name: "FollowUpNotes",
        fields: &[
            "Time",
            "MidwifeNote",
            "CopySent",
            "BloodTest",
            "HemoglobinLevel",
            "FollowUp",
        ],
    },
    ServiceDefinition {
        name: "PrenatalCheckup",
        fields: &[
            "PersonalNumber",
            "Name",
            "GestationalWeek",
            "LastMenstrualPeriod",
            "ExpectedDueDate",
            "BloodPressure",
            "Weight",
            "FetalMovements",
        ],
    },
    ServiceDefinition {
        name: "RoutineBloodTestResults",
        fields: &[
            "Hemoglobin",
            "Ferritin",
            "TSH",
            "FreeT4",
            "Hepatitis",
            "HIV",
            "Syphilis",
            "RhFactor",
        ],
    },
    ServiceDefinition {
        name: "FollowUpBloodTestResults",
        fields: &[
            "Hemoglobin",
            "BloodTransfusion",
            "HemoglobinPostTransfusion",
            "FollowUp",
        ],
    },
    ServiceDefinition {
        name: "Ultrasound",
        fields: &[
            "AmnioticFluid",
            "FetalHeartRate",
            "BiparietalDiameter",
            "AbdominalDiameter",
            "FemurLength",
            "EstimatedDeliveryDate",
        ],
    },
    ServiceDefinition {
        name: "PregnancyOverview",
        fields: &[
            "GestationalWeek",
            "ExpectedDeliveryDate",
            "BloodPressure",
            "Weight",
            "FetalActivity",
            "Complications",
            "Hemoglobin",
        ],
    },
    ServiceDefinition {
        name: "DeliveryInformation",
        fields: &[
            "ChildsBirthDate",
            "BirthWeight",
            "HeadCircumference",
            "Length",
            "ApgarScore",
            "DeliveryMethod",
            "DeliveryComplications",
        ],
    },
    ServiceDefinition {
        name: "PostpartumHealthCheck",
        fields: &[
            "BloodPressure",
            "Hemoglobin",
            "BloodTransfusion",
            "PostTransfusionHemoglobin",
            "WoundHealed",
            "FollowUp",
        ],
    },
    ServiceDefinition {
        name: "MaternalHealthSummary",
        fields: &[
            "Weight",
            "BloodPressure",
            "Hemoglobin",
            "FetalMovements",
            "Complications",
        ],
    },
    ServiceDefinition {
        name: "InfantHealthStatus",
        fields: &[
            "BirthWeight",
            "HeadCircumference",
            "ApgarScore",
            "BirthStatus",
            "Breastfeeding",
            "FollowUp",
        ],
    },
];

/// The traversal order applied after registration. Every entry is a catalog
/// key; registration itself is the entry point and never appears here.
const TRAVERSAL_ORDER: &[&str] = &[
    "MidwifeNotes",
    "LaborProgressChart",
    "DeliverySummary",
    "LabResults",
    "UltrasoundSummary",
    "DischargeSummary",
    "MaternityReport",
    "FollowUpNotes",
    "PrenatalCheckup",
    "RoutineBloodTestResults",
    "FollowUpBloodTestResults",
    "Ultrasound",
    "PregnancyOverview",
    "DeliveryInformation",
    "PostpartumHealthCheck",
    "MaternalHealthSummary",
    "InfantHealthStatus",
];

/// The immutable catalog of services and their traversal order.
///
/// Construct once with [`ServiceCatalog::standard`] and share via `Arc`.
#[derive(Clone, Debug)]
pub struct ServiceCatalog {
    definitions: &'static [ServiceDefinition],
    order: &'static [&'static str],
}

impl ServiceCatalog {
    /// Builds the standard maternity care catalog.
    pub fn standard() -> Self {
        Self {
            definitions: DEFINITIONS,
            order: TRAVERSAL_ORDER,
        }
    }

    /// Returns the ordered field names for `service`, or `None` if the name
    /// is not in the catalog.
    pub fn fields_for(&self, service: &str) -> Option<&'static [&'static str]> {
        self.definitions
            .iter()
            .find(|def| def.name == service)
            .map(|def| def.fields)
    }

    /// Returns the registration form's field names.
    ///
    /// Registration is always present in the catalog, so unlike
    /// [`fields_for`](Self::fields_for) this cannot miss.
    pub fn registration_fields(&self) -> &'static [&'static str] {
        DEFINITIONS[0].fields
    }

    /// Returns the fixed traversal order applied after registration.
    pub fn traversal_order(&self) -> &'static [&'static str] {
        self.order
    }

    /// Returns every service name in catalog definition order.
    pub fn service_names(&self) -> Vec<&'static str> {
        self.definitions.iter().map(|def| def.name).collect()
    }

    /// Returns true if `service` is a catalog key.
    pub fn contains(&self, service: &str) -> bool {
        self.definitions.iter().any(|def| def.name == service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_for_returns_ordered_fields() {
        let catalog = ServiceCatalog::standard();
        let fields = catalog
            .fields_for("MidwifeNotes")
            .expect("MidwifeNotes should be in the catalog");
        assert_eq!(
            fields,
            ["Time", "MidwifeNote", "DayNote", "Discharge", "MaternityReport"]
        );
    }

    #[test]
    fn fields_for_rejects_unknown_service() {
        let catalog = ServiceCatalog::standard();
        assert!(catalog.fields_for("Cardiology").is_none());
    }

    #[test]
    fn registration_fields_start_with_personal_number() {
        let catalog = ServiceCatalog::standard();
        assert_eq!(catalog.registration_fields()[0], "PersonalNumber");
    }

    #[test]
    fn traversal_order_contains_only_catalog_services() {
        let catalog = ServiceCatalog::standard();
        for service in catalog.traversal_order() {
            assert!(
                catalog.contains(service),
                "order entry {} should be a catalog key",
                service
            );
        }
    }

    #[test]
    fn registration_is_not_part_of_the_traversal() {
        let catalog = ServiceCatalog::standard();
        assert!(!catalog
            .traversal_order()
            .contains(&crate::constants::REGISTRATION_SERVICE));
    }

    #[test]
    fn service_names_lead_with_registration() {
        let catalog = ServiceCatalog::standard();
        let names = catalog.service_names();
        assert_eq!(names[0], "PatientRegistration");
        assert_eq!(names.len(), 18 + 1, "18 services plus registration");
    }
}
