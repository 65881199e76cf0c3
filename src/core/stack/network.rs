//! Network topology.
//!
//! One VPC across two availability zones with three subnet tiers per zone:
//! public `ingress`, private `application` behind a single shared NAT
//! gateway, and isolated `database` with no route out.

use serde_json::{json, Value};
use tracing::debug;

use crate::core::cidr::{Allocator, Cidr};
use crate::core::constants::{MAX_AZS, SUBNET_MASK, VPC_CIDR};
use crate::core::deployment::Deployment;
use crate::core::naming::capitalize;
use crate::core::template::intrinsic::{azs, get_att, reference, select, tag};
use crate::core::template::{Resource, Template};
use crate::core::types::LogicalId;
use crate::error::{Result, SynthError};

/// Subnet categories, in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Public,
    Private,
    Isolated,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Public, Tier::Private, Tier::Isolated];

    /// The subnet group name suffix.
    pub fn group(self) -> &'static str {
        match self {
            Tier::Public => "ingress",
            Tier::Private => "application",
            Tier::Isolated => "database",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Public => "Public",
            Tier::Private => "Private",
            Tier::Isolated => "Isolated",
        }
    }
}

/// A declared subnet.
#[derive(Debug, Clone)]
pub struct Subnet {
    pub id: LogicalId,
    pub tier: Tier,
    pub zone: usize,
    pub cidr: Cidr,
}

/// Handles to the declared network.
#[derive(Debug, Clone)]
pub struct Network {
    pub vpc: LogicalId,
    pub subnets: Vec<Subnet>,
    pub nat_gateway: LogicalId,
}

impl Network {
    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &Subnet> {
        self.subnets.iter().filter(move |s| s.tier == tier)
    }

    /// `Ref`s to every subnet in a tier, for `Subnets`/`VPCZoneIdentifier`.
    pub fn subnet_refs(&self, tier: Tier) -> Vec<Value> {
        self.tier(tier).map(|s| reference(&s.id)).collect()
    }
}

/// Declare the VPC, its subnets, gateways and routing.
pub fn declare(template: &mut Template, deployment: &Deployment) -> Result<Network> {
    let namer = deployment.namer();
    let vpc_name = namer.generate_name("VPC");

    let parent: Cidr = VPC_CIDR.parse().map_err(|_| SynthError::AddressSpaceExhausted {
        base: VPC_CIDR.to_string(),
        mask: SUBNET_MASK,
    })?;

    let vpc = template.add_resource(
        namer.logical_id("VPC"),
        Resource::new(
            "AWS::EC2::VPC",
            json!({
                "CidrBlock": parent.to_string(),
                "EnableDnsHostnames": true,
                "EnableDnsSupport": true,
                "InstanceTenancy": "default",
                "Tags": [tag("Name", vpc_name.clone())],
            }),
        ),
    )?;

    let igw = template.add_resource(
        format!("{}IGW", vpc),
        Resource::new(
            "AWS::EC2::InternetGateway",
            json!({ "Tags": [tag("Name", vpc_name.clone())] }),
        ),
    )?;
    let attachment = template.add_resource(
        format!("{}VPCGW", vpc),
        Resource::new(
            "AWS::EC2::VPCGatewayAttachment",
            json!({ "VpcId": reference(&vpc), "InternetGatewayId": reference(&igw) }),
        ),
    )?;

    let mut alloc = Allocator::new(parent);
    let mut subnets = Vec::with_capacity(Tier::ALL.len() * MAX_AZS);

    for tier in Tier::ALL {
        let group = namer.generate_name(tier.group());
        for zone in 0..MAX_AZS {
            let cidr = alloc.allocate(SUBNET_MASK)?;
            let id = namer.logical_id(&format!("{}Subnet{}", capitalize(tier.group()), zone + 1));

            template.add_resource(
                id.clone(),
                Resource::new(
                    "AWS::EC2::Subnet",
                    json!({
                        "VpcId": reference(&vpc),
                        "AvailabilityZone": select(zone, azs()),
                        "CidrBlock": cidr.to_string(),
                        "MapPublicIpOnLaunch": tier == Tier::Public,
                        "Tags": [
                            tag("Name", format!("{}/{}Subnet{}", vpc_name, group, zone + 1)),
                            tag("berth:subnet-name", group.clone()),
                            tag("berth:subnet-type", tier.label()),
                        ],
                    }),
                ),
            )?;

            subnets.push(Subnet { id, tier, zone, cidr });
        }
    }

    // The single NAT gateway lives in the first public subnet.
    let first_public = subnets
        .iter()
        .find(|s| s.tier == Tier::Public)
        .map(|s| s.id.clone())
        .unwrap_or_default();
    let eip = template.add_resource(
        format!("{}EIP", first_public),
        Resource::new("AWS::EC2::EIP", json!({ "Domain": "vpc" })),
    )?;
    let nat_gateway = template.add_resource(
        format!("{}NATGateway", first_public),
        Resource::new(
            "AWS::EC2::NatGateway",
            json!({
                "AllocationId": get_att(&eip, "AllocationId"),
                "SubnetId": reference(&first_public),
                "Tags": [tag("Name", format!("{}/NATGateway", vpc_name))],
            }),
        )
        .depends_on(attachment.clone()),
    )?;

    for subnet in &subnets {
        let table = template.add_resource(
            format!("{}RouteTable", subnet.id),
            Resource::new("AWS::EC2::RouteTable", json!({ "VpcId": reference(&vpc) })),
        )?;
        template.add_resource(
            format!("{}RouteTableAssociation", subnet.id),
            Resource::new(
                "AWS::EC2::SubnetRouteTableAssociation",
                json!({ "RouteTableId": reference(&table), "SubnetId": reference(&subnet.id) }),
            ),
        )?;

        let route = match subnet.tier {
            Tier::Public => Some(
                Resource::new(
                    "AWS::EC2::Route",
                    json!({
                        "RouteTableId": reference(&table),
                        "DestinationCidrBlock": "0.0.0.0/0",
                        "GatewayId": reference(&igw),
                    }),
                )
                .depends_on(attachment.clone()),
            ),
            Tier::Private => Some(Resource::new(
                "AWS::EC2::Route",
                json!({
                    "RouteTableId": reference(&table),
                    "DestinationCidrBlock": "0.0.0.0/0",
                    "NatGatewayId": reference(&nat_gateway),
                }),
            )),
            Tier::Isolated => None,
        };
        if let Some(route) = route {
            template.add_resource(format!("{}DefaultRoute", subnet.id), route)?;
        }
    }

    debug!(vpc = %vpc, subnets = subnets.len(), "network declared");

    Ok(Network {
        vpc,
        subnets,
        nat_gateway,
    })
}
