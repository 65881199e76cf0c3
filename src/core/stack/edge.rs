//! Load balancer, listener, certificate and operator outputs.

use serde_json::{json, Value};
use tracing::debug;

use crate::core::constants::{CONTAINER_NAME, CONTAINER_PORT};
use crate::core::deployment::Deployment;
use crate::core::stack::compute::Compute;
use crate::core::stack::network::{Network, Tier};
use crate::core::template::intrinsic::{get_att, join, reference, tag};
use crate::core::template::{Output, Resource, Template};
use crate::core::types::LogicalId;
use crate::error::{Result, SynthError};

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;

/// Ports bridge-mode containers are published on.
const EPHEMERAL_PORTS: (u16, u16) = (32768, 65535);

/// Handles to the declared edge resources.
#[derive(Debug, Clone)]
pub struct Edge {
    pub load_balancer: LogicalId,
    pub listener: LogicalId,
    pub target_group: LogicalId,
    pub certificate: Option<LogicalId>,
    pub outputs: Vec<LogicalId>,
}

/// Declare the ALB in front of the service and register the service with it.
pub fn declare(
    template: &mut Template,
    deployment: &Deployment,
    network: &Network,
    compute: &Compute,
) -> Result<Edge> {
    let namer = deployment.namer();
    let tls = deployment.variant.uses_tls();
    let listener_port = if tls { HTTPS_PORT } else { HTTP_PORT };

    // Certificate, validated by DNS records the operator adds by hand.
    let certificate = if tls {
        Some(template.add_resource(
            namer.logical_id("Cert"),
            Resource::new(
                "AWS::CertificateManager::Certificate",
                json!({
                    "DomainName": deployment.domain_name,
                    "SubjectAlternativeNames": [format!("*.{}", deployment.domain_name)],
                    "ValidationMethod": "DNS",
                    "Tags": [tag("Name", namer.generate_name("Cert"))],
                }),
            ),
        )?)
    } else {
        None
    };

    let alb_name = namer.generate_name("ALB");
    let alb_id = namer.logical_id("ALB");

    let security_group = template.add_resource(
        format!("{}SecurityGroup", alb_id),
        Resource::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": format!("Automatically created Security Group for ELB {}", alb_name),
                "VpcId": reference(&network.vpc),
                "SecurityGroupIngress": [{
                    "CidrIp": "0.0.0.0/0",
                    "Description": format!("Allow from anyone on port {}", listener_port),
                    "FromPort": listener_port,
                    "ToPort": listener_port,
                    "IpProtocol": "tcp",
                }],
                "SecurityGroupEgress": [{
                    "CidrIp": "0.0.0.0/0",
                    "Description": "Allow all outbound traffic by default",
                    "IpProtocol": "-1",
                }],
            }),
        ),
    )?;

    let mut alb = Resource::new(
        "AWS::ElasticLoadBalancingV2::LoadBalancer",
        json!({
            "Type": "application",
            "Scheme": "internet-facing",
            "Subnets": network.subnet_refs(Tier::Public),
            "SecurityGroups": [get_att(&security_group, "GroupId")],
            "LoadBalancerAttributes": [
                { "Key": "deletion_protection.enabled", "Value": "false" },
            ],
            "Tags": [tag("Name", alb_name.clone())],
        }),
    );
    // Public routes must exist before the ALB can accept traffic.
    for subnet in network.tier(Tier::Public) {
        alb = alb.depends_on(format!("{}DefaultRoute", subnet.id));
    }
    let load_balancer = template.add_resource(alb_id, alb)?;

    let target_group = template.add_resource(
        namer.logical_id("LaravelTargetGroup"),
        Resource::new(
            "AWS::ElasticLoadBalancingV2::TargetGroup",
            json!({
                "Port": CONTAINER_PORT,
                "Protocol": "HTTP",
                "TargetType": if compute.is_fargate() { "ip" } else { "instance" },
                "VpcId": reference(&network.vpc),
                "TargetGroupAttributes": [
                    { "Key": "stickiness.enabled", "Value": "false" },
                ],
                "Tags": [tag("Name", namer.generate_name("LaravelTargetGroup"))],
            }),
        ),
    )?;

    let mut listener_properties = json!({
        "LoadBalancerArn": reference(&load_balancer),
        "Port": listener_port,
        "Protocol": if tls { "HTTPS" } else { "HTTP" },
        "DefaultActions": [{ "Type": "forward", "TargetGroupArn": reference(&target_group) }],
    });
    if let Some(cert) = &certificate {
        listener_properties["Certificates"] = json!([{ "CertificateArn": reference(cert) }]);
    }
    let listener = template.add_resource(
        format!("{}Listener", load_balancer),
        Resource::new("AWS::ElasticLoadBalancingV2::Listener", listener_properties),
    )?;

    // Let the ALB reach the targets.
    let (from_port, to_port) = if compute.is_fargate() {
        (CONTAINER_PORT, CONTAINER_PORT)
    } else {
        EPHEMERAL_PORTS
    };
    template.add_resource(
        format!("{}IngressFrom{}", compute.security_group, security_group),
        Resource::new(
            "AWS::EC2::SecurityGroupIngress",
            json!({
                "GroupId": get_att(&compute.security_group, "GroupId"),
                "SourceSecurityGroupId": get_att(&security_group, "GroupId"),
                "IpProtocol": "tcp",
                "FromPort": from_port,
                "ToPort": to_port,
                "Description": "Load balancer to target",
            }),
        ),
    )?;

    register_service(template, compute, &target_group, &listener)?;

    let outputs = declare_outputs(template, deployment, &load_balancer)?;

    debug!(
        alb = %load_balancer,
        port = listener_port,
        tls,
        outputs = outputs.len(),
        "edge declared"
    );

    Ok(Edge {
        load_balancer,
        listener,
        target_group,
        certificate,
        outputs,
    })
}

/// Bind the service's container port to the target group.
fn register_service(
    template: &mut Template,
    compute: &Compute,
    target_group: &str,
    listener: &str,
) -> Result<()> {
    let service = template
        .resource_mut(&compute.service)
        .ok_or_else(|| SynthError::DanglingReference {
            from: target_group.to_string(),
            target: compute.service.clone(),
        })?;

    service.properties["LoadBalancers"] = json!([{
        "ContainerName": CONTAINER_NAME,
        "ContainerPort": CONTAINER_PORT,
        "TargetGroupArn": reference(target_group),
    }]);
    service.properties["HealthCheckGracePeriodSeconds"] = json!(60);
    service.depends_on.push(listener.to_string());
    Ok(())
}

fn declare_outputs(
    template: &mut Template,
    deployment: &Deployment,
    load_balancer: &str,
) -> Result<Vec<LogicalId>> {
    let namer = deployment.namer();
    let dns_name = get_att(load_balancer, "DNSName");

    let mut outputs: Vec<(&str, Value)> = vec![("AlbDnsName", dns_name.clone())];
    if deployment.variant.uses_tls() {
        outputs.push((
            "ActionCname",
            join(
                "",
                vec![
                    json!(format!("Please setup a CNAME record {} to ", deployment.site_host())),
                    dns_name,
                ],
            ),
        ));
        outputs.push((
            "ActionVisit",
            json!(format!("Visit https://{}", deployment.site_host())),
        ));
    }

    outputs
        .into_iter()
        .map(|(suffix, value)| {
            template.add_output(
                namer.logical_id(suffix),
                Output::exported(value, namer.generate_name(suffix)),
            )
        })
        .collect()
}
