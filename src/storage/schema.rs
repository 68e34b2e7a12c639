//! Attribute definitions of the monitoring object types
//!
//! Lists the directives the monitoring core accepts for each object type it
//! reads from its configuration files. `any` holds the template directives
//! shared by every type.

use crate::core::store::ObjectDefinitions;

const ANY: &[&str] = &["use", "name", "register"];

const HOST: &[&str] = &[
    "host_name",
    "alias",
    "display_name",
    "address",
    "parents",
    "hostgroups",
    "check_command",
    "initial_state",
    "max_check_attempts",
    "check_interval",
    "retry_interval",
    "active_checks_enabled",
    "passive_checks_enabled",
    "check_period",
    "obsess_over_host",
    "check_freshness",
    "freshness_threshold",
    "event_handler",
    "event_handler_enabled",
    "low_flap_threshold",
    "high_flap_threshold",
    "flap_detection_enabled",
    "flap_detection_options",
    "process_perf_data",
    "retain_status_information",
    "retain_nonstatus_information",
    "contacts",
    "contact_groups",
    "notification_interval",
    "first_notification_delay",
    "notification_period",
    "notification_options",
    "notifications_enabled",
    "stalking_options",
    "notes",
    "notes_url",
    "action_url",
    "icon_image",
    "icon_image_alt",
    "vrml_image",
    "statusmap_image",
    "2d_coords",
    "3d_coords",
];

const SERVICE: &[&str] = &[
    "host_name",
    "hostgroup_name",
    "service_description",
    "display_name",
    "servicegroups",
    "is_volatile",
    "check_command",
    "initial_state",
    "max_check_attempts",
    "check_interval",
    "retry_interval",
    "active_checks_enabled",
    "passive_checks_enabled",
    "check_period",
    "obsess_over_service",
    "check_freshness",
    "freshness_threshold",
    "event_handler",
    "event_handler_enabled",
    "low_flap_threshold",
    "high_flap_threshold",
    "flap_detection_enabled",
    "flap_detection_options",
    "process_perf_data",
    "retain_status_information",
    "retain_nonstatus_information",
    "notification_interval",
    "first_notification_delay",
    "notification_period",
    "notification_options",
    "notifications_enabled",
    "contacts",
    "contact_groups",
    "stalking_options",
    "notes",
    "notes_url",
    "action_url",
    "icon_image",
    "icon_image_alt",
];

const HOSTGROUP: &[&str] = &[
    "hostgroup_name",
    "alias",
    "members",
    "hostgroup_members",
    "notes",
    "notes_url",
    "action_url",
];

const SERVICEGROUP: &[&str] = &[
    "servicegroup_name",
    "alias",
    "members",
    "servicegroup_members",
    "notes",
    "notes_url",
    "action_url",
];

const CONTACT: &[&str] = &[
    "contact_name",
    "alias",
    "contactgroups",
    "host_notifications_enabled",
    "service_notifications_enabled",
    "host_notification_period",
    "service_notification_period",
    "host_notification_options",
    "service_notification_options",
    "host_notification_commands",
    "service_notification_commands",
    "email",
    "pager",
    "address1",
    "address2",
    "address3",
    "address4",
    "address5",
    "address6",
    "can_submit_commands",
    "retain_status_information",
    "retain_nonstatus_information",
];

const CONTACTGROUP: &[&str] = &[
    "contactgroup_name",
    "alias",
    "members",
    "contactgroup_members",
];

const TIMEPERIOD: &[&str] = &[
    "timeperiod_name",
    "alias",
    "exclude",
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

const COMMAND: &[&str] = &["command_name", "command_line"];

const HOSTEXTINFO: &[&str] = &[
    "host_name",
    "notes",
    "notes_url",
    "action_url",
    "icon_image",
    "icon_image_alt",
    "vrml_image",
    "statusmap_image",
    "2d_coords",
    "3d_coords",
];

/// Object types and their attributes
pub const OBJECT_TYPES: &[(&str, &[&str])] = &[
    ("any", ANY),
    ("host", HOST),
    ("service", SERVICE),
    ("hostgroup", HOSTGROUP),
    ("servicegroup", SERVICEGROUP),
    ("contact", CONTACT),
    ("contactgroup", CONTACTGROUP),
    ("timeperiod", TIMEPERIOD),
    ("command", COMMAND),
    ("hostextinfo", HOSTEXTINFO),
];

/// Definitions of every monitoring object type, including `any`
pub fn monitoring_object_definitions() -> ObjectDefinitions {
    OBJECT_TYPES
        .iter()
        .map(|(object_type, attributes)| {
            (
                object_type.to_string(),
                attributes.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{EndpointCatalog, KEY_ATTRIBUTES};

    #[test]
    fn test_every_keyed_type_is_defined() {
        let definitions = monitoring_object_definitions();
        for (object_type, key) in KEY_ATTRIBUTES {
            let attributes = definitions
                .get(*object_type)
                .unwrap_or_else(|| panic!("{} is not defined", object_type));
            assert!(attributes.contains(*key), "{} lacks {}", object_type, key);
        }
    }

    #[test]
    fn test_catalog_from_schema() {
        let catalog = EndpointCatalog::from_definitions(&monitoring_object_definitions());
        assert_eq!(catalog.len(), KEY_ATTRIBUTES.len());
        assert!(catalog.definition_for("any").is_err());

        let host = catalog.definition_for("host").unwrap();
        assert!(host.has_attribute("address"));
        assert!(host.has_attribute("use"));
        assert_eq!(host.key_attribute, "host_name");
    }
}
