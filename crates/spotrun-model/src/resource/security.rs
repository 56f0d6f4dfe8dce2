use serde::{Deserialize, Serialize};

use crate::{
    domain::{Cidr, Flag, Protocol, ResourceId},
    error::{ModelError, ModelResult},
};

/// Single inbound allow rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub protocol: Protocol,
    pub port: u16,
    /// Source range traffic is admitted from.
    pub source: Cidr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IngressRule {
    pub fn tcp(port: u16, source: Cidr) -> Self {
        Self {
            protocol: Protocol::Tcp,
            port,
            source,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.port == 0 {
            return Err(ModelError::InvalidPort {
                protocol: self.protocol.to_string(),
                port: self.port,
            });
        }
        Ok(())
    }

    /// `true` if the rule admits `protocol`/`port` from every address.
    pub fn is_open(&self, protocol: Protocol, port: u16) -> bool {
        self.protocol == protocol && self.port == port && self.source.is_unrestricted()
    }
}

/// Network access-control boundary (security group) and its ingress rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupSpec {
    pub network: ResourceId,
    #[serde(default)]
    pub ingress_rules: Vec<IngressRule>,
    /// Egress is unrestricted unless disabled.
    #[serde(default)]
    pub allow_all_outbound: Flag,
}

impl SecurityGroupSpec {
    pub fn validate(&self) -> ModelResult<()> {
        self.ingress_rules.iter().try_for_each(IngressRule::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_zero_is_rejected() {
        let rule = IngressRule::tcp(0, Cidr::any_ipv4());
        assert_eq!(
            rule.validate(),
            Err(ModelError::InvalidPort {
                protocol: "tcp".into(),
                port: 0
            })
        );
    }

    #[test]
    fn open_ssh_rule_is_detected() {
        let rule = IngressRule::tcp(22, Cidr::any_ipv4()).with_description("Allow SSH access");
        assert!(rule.validate().is_ok());
        assert!(rule.is_open(Protocol::Tcp, 22));
        assert!(!rule.is_open(Protocol::Udp, 22));

        let narrow = IngressRule::tcp(22, "10.0.0.0/8".parse().unwrap());
        assert!(!narrow.is_open(Protocol::Tcp, 22));
    }

    #[test]
    fn zero_rules_are_legal() {
        let sg = SecurityGroupSpec {
            network: ResourceId::new("Vpc").unwrap(),
            ingress_rules: vec![],
            allow_all_outbound: Flag::default(),
        };
        assert!(sg.validate().is_ok());
    }

    #[test]
    fn rule_json_shape() {
        let rule = IngressRule::tcp(22, Cidr::any_ipv4()).with_description("Allow SSH access");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(
            json,
            r#"{"protocol":"tcp","port":22,"source":"0.0.0.0/0","description":"Allow SSH access"}"#
        );
    }
}
