//! # Properties
//!
//! Label extraction and mapping parsing over generated inputs.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;
    use ps_01_label_extractor::{extract, ContainerInfo, LabelConfig, PortBinding};
    use shared_types::{parse_port_mapping, Protocol};

    fn protocol() -> impl Strategy<Value = Protocol> {
        prop_oneof![Just(Protocol::Tcp), Just(Protocol::Udp)]
    }

    fn info(labels: Vec<(&str, String)>, ports: Vec<PortBinding>) -> ContainerInfo {
        let labels: HashMap<String, String> = labels
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        ContainerInfo::new("f00dfeedf00dfeed", Some("/svc"), labels, ports)
    }

    proptest! {
        #[test]
        fn host_directives_round_trip_through_labels(
            specs in prop::collection::vec((1u16.., 1u16.., protocol()), 1..6)
        ) {
            let value = specs
                .iter()
                .map(|(e, i, p)| format!("{e}:{i}/{}", p.as_str().to_lowercase()))
                .collect::<Vec<_>>()
                .join(",");
            let labels = LabelConfig::default();
            let mappings = extract(&info(vec![(labels.forward_label.as_str(), value)], vec![]), &labels);

            prop_assert_eq!(mappings.len(), specs.len());
            for (mapping, (e, i, p)) in mappings.iter().zip(&specs) {
                prop_assert_eq!(mapping.external_port, *e);
                prop_assert_eq!(mapping.internal_port, *i);
                prop_assert_eq!(mapping.protocol, *p);
                prop_assert_eq!(mapping.name.as_str(), "svc");
            }
        }

        #[test]
        fn unpublished_container_ports_yield_nothing(private in 1u16.., proto in protocol()) {
            let labels = LabelConfig::default();
            let directive = format!("{private}/{}", proto.as_str());
            let binding = PortBinding::new(private, 0, proto.as_str());
            let mappings = extract(
                &info(vec![(labels.container_label.as_str(), directive)], vec![binding]),
                &labels,
            );
            prop_assert!(mappings.is_empty());
        }

        #[test]
        fn bare_port_maps_to_itself(port in 1u16..) {
            let mapping = parse_port_mapping(&port.to_string()).unwrap();
            prop_assert_eq!(mapping.external_port, port);
            prop_assert_eq!(mapping.internal_port, port);
            prop_assert_eq!(mapping.protocol, Protocol::Tcp);
        }

        #[test]
        fn parser_never_panics(spec in "\\PC{0,16}") {
            let _ = parse_port_mapping(&spec);
        }
    }
}
