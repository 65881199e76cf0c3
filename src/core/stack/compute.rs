//! ECS cluster, task definition and service.
//!
//! The basic variant runs on Fargate. The richer variants run on an Auto
//! Scaling group of container instances, ship container logs, and may carry
//! parameter store secrets.

use serde_json::{json, Value};
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::core::constants::*;
use crate::core::deployment::Deployment;
use crate::core::secrets::SecretReference;
use crate::core::stack::network::{Network, Tier};
use crate::core::template::intrinsic::{
    account_or_pseudo, get_att, reference, region_or_pseudo, sub, tag,
};
use crate::core::template::{Parameter, Resource, Template};
use crate::core::types::LogicalId;
use crate::error::Result;

/// How tasks are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    Fargate,
    /// Bridge-mode tasks on the cluster's Auto Scaling group.
    Ec2,
}

/// Handles to the declared compute resources.
#[derive(Debug, Clone)]
pub struct Compute {
    pub cluster: LogicalId,
    pub service: LogicalId,
    /// Group the load balancer must be allowed into.
    pub security_group: LogicalId,
    pub log_group: Option<LogicalId>,
    pub launch: Launch,
}

impl Compute {
    pub fn is_fargate(&self) -> bool {
        matches!(self.launch, Launch::Fargate)
    }
}

fn assume_role(service: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Action": "sts:AssumeRole",
            "Effect": "Allow",
            "Principal": { "Service": service },
        }],
    })
}

fn allow(actions: Value, resource: Value) -> Value {
    json!({ "Action": actions, "Effect": "Allow", "Resource": resource })
}

fn security_group(vpc: &str, description: String) -> Resource {
    Resource::new(
        "AWS::EC2::SecurityGroup",
        json!({
            "GroupDescription": description,
            "VpcId": reference(vpc),
            "SecurityGroupEgress": [{
                "CidrIp": "0.0.0.0/0",
                "Description": "Allow all outbound traffic by default",
                "IpProtocol": "-1",
            }],
        }),
    )
}

/// Declare cluster, capacity, task definition and service.
pub fn declare(
    template: &mut Template,
    deployment: &Deployment,
    network: &Network,
    sizing: &ServiceConfig,
    secrets: &[SecretReference],
) -> Result<Compute> {
    let variant = deployment.variant;
    let stack = deployment.stack_name();
    let region = region_or_pseudo(&deployment.region);
    let account = account_or_pseudo(&deployment.account);
    let repo = deployment.repository();

    let cluster = template.add_resource(
        "LaravelWorkshopCluster",
        Resource::new("AWS::ECS::Cluster", json!({})),
    )?;

    // Container instances: (auto scaling group, instance security group)
    let capacity = if variant.uses_ec2() {
        let ami = template.add_parameter(
            "EcsOptimizedAmi",
            Parameter::ssm_image_id(ECS_AMI_PARAMETER)
                .describe("ECS-optimized Amazon Linux 2 image"),
        )?;
        let sg = template.add_resource(
            "DefaultAutoScalingGroupInstanceSecurityGroup",
            security_group(
                &network.vpc,
                format!("{}/LaravelWorkshopCluster/DefaultAutoScalingGroup/InstanceSecurityGroup", stack),
            ),
        )?;
        let role = template.add_resource(
            "DefaultAutoScalingGroupInstanceRole",
            Resource::new(
                "AWS::IAM::Role",
                json!({
                    "AssumeRolePolicyDocument": assume_role("ec2.amazonaws.com"),
                    "ManagedPolicyArns": [sub(
                        "arn:${AWS::Partition}:iam::aws:policy/service-role/AmazonEC2ContainerServiceforEC2Role",
                    )],
                }),
            ),
        )?;
        let profile = template.add_resource(
            "DefaultAutoScalingGroupInstanceProfile",
            Resource::new(
                "AWS::IAM::InstanceProfile",
                json!({ "Roles": [reference(&role)] }),
            ),
        )?;
        let launch_template = template.add_resource(
            "DefaultAutoScalingGroupLaunchTemplate",
            Resource::new(
                "AWS::EC2::LaunchTemplate",
                json!({
                    "LaunchTemplateData": {
                        "ImageId": reference(&ami),
                        "InstanceType": INSTANCE_TYPE,
                        "IamInstanceProfile": { "Arn": get_att(&profile, "Arn") },
                        "SecurityGroupIds": [get_att(&sg, "GroupId")],
                        "UserData": {
                            "Fn::Base64": sub(format!(
                                "#!/bin/bash\necho ECS_CLUSTER=${{{}}} >> /etc/ecs/ecs.config",
                                cluster
                            )),
                        },
                    },
                }),
            ),
        )?;
        let auto_scaling_group = template.add_resource(
            "DefaultAutoScalingGroup",
            Resource::new(
                "AWS::AutoScaling::AutoScalingGroup",
                json!({
                    "MinSize": INSTANCE_MIN.to_string(),
                    "MaxSize": INSTANCE_MAX.to_string(),
                    "LaunchTemplate": {
                        "LaunchTemplateId": reference(&launch_template),
                        "Version": get_att(&launch_template, "LatestVersionNumber"),
                    },
                    "VPCZoneIdentifier": network.subnet_refs(Tier::Private),
                    "Tags": [{
                        "Key": "Name",
                        "PropagateAtLaunch": true,
                        "Value": format!("{}/LaravelWorkshopCluster/DefaultAutoScalingGroup", stack),
                    }],
                }),
            ),
        )?;
        debug!(asg = %auto_scaling_group, instance_type = INSTANCE_TYPE, "cluster capacity declared");
        Some((auto_scaling_group, sg))
    } else {
        None
    };

    let security_group = match &capacity {
        Some((_, instance_security_group)) => instance_security_group.clone(),
        None => template.add_resource(
            "DefaultServiceSecurityGroup",
            security_group(&network.vpc, format!("{}/DefaultService/SecurityGroup", stack)),
        )?,
    };

    // Logging
    let log_group = match deployment.stream_prefix() {
        Some(_) => Some(template.add_resource(
            "DefaultTaskDefLogGroup",
            Resource::new(
                "AWS::Logs::LogGroup",
                json!({ "RetentionInDays": LOG_RETENTION_DAYS }),
            ),
        )?),
        None => None,
    };

    // Roles
    let task_role = template.add_resource(
        "DefaultTaskDefTaskRole",
        Resource::new(
            "AWS::IAM::Role",
            json!({ "AssumeRolePolicyDocument": assume_role("ecs-tasks.amazonaws.com") }),
        ),
    )?;
    let execution_role = template.add_resource(
        "DefaultTaskDefExecutionRole",
        Resource::new(
            "AWS::IAM::Role",
            json!({ "AssumeRolePolicyDocument": assume_role("ecs-tasks.amazonaws.com") }),
        ),
    )?;

    let mut statements = vec![
        allow(
            json!([
                "ecr:BatchCheckLayerAvailability",
                "ecr:GetDownloadUrlForLayer",
                "ecr:BatchGetImage",
            ]),
            sub(format!(
                "arn:${{AWS::Partition}}:ecr:{}:{}:repository/{}",
                region, account, repo
            )),
        ),
        allow(json!("ecr:GetAuthorizationToken"), json!("*")),
    ];
    if let Some(lg) = &log_group {
        statements.push(allow(
            json!(["logs:CreateLogStream", "logs:PutLogEvents"]),
            get_att(lg, "Arn"),
        ));
    }
    if !secrets.is_empty() {
        let arns: Vec<Value> = secrets.iter().map(SecretReference::parameter_arn).collect();
        statements.push(allow(
            json!(["ssm:DescribeParameters", "ssm:GetParameters", "ssm:GetParameter", "ssm:GetParameterHistory"]),
            Value::Array(arns),
        ));
    }
    if let Some(enc) = secrets.iter().find_map(|s| s.encryption.as_ref()) {
        statements.push(allow(json!("kms:Decrypt"), enc.key_arn.clone()));
    }
    let execution_policy = template.add_resource(
        "DefaultTaskDefExecutionRoleDefaultPolicy",
        Resource::new(
            "AWS::IAM::Policy",
            json!({
                "PolicyDocument": { "Version": "2012-10-17", "Statement": statements },
                "PolicyName": "DefaultTaskDefExecutionRoleDefaultPolicy",
                "Roles": [reference(&execution_role)],
            }),
        ),
    )?;

    // Container
    let image = sub(format!(
        "{}.dkr.ecr.{}.${{AWS::URLSuffix}}/{}:latest",
        account, region, repo
    ));

    let mut port_mapping = json!({ "ContainerPort": CONTAINER_PORT, "Protocol": "tcp" });
    if !variant.uses_ec2() {
        port_mapping["HostPort"] = json!(CONTAINER_PORT);
    }

    let mut container = json!({
        "Name": CONTAINER_NAME,
        "Image": image,
        "Essential": true,
        "PortMappings": [port_mapping],
    });
    if variant.uses_ec2() {
        container["Cpu"] = json!(TASK_CPU);
        container["Memory"] = json!(TASK_MEMORY_MIB);
    } else {
        container["Memory"] = json!(FARGATE_CONTAINER_MEMORY_MIB);
    }
    if let (Some(lg), Some(prefix)) = (&log_group, deployment.stream_prefix()) {
        let region_value = if deployment.region.is_empty() {
            reference("AWS::Region")
        } else {
            json!(deployment.region)
        };
        container["LogConfiguration"] = json!({
            "LogDriver": "awslogs",
            "Options": {
                "awslogs-group": reference(lg),
                "awslogs-stream-prefix": prefix,
                "awslogs-region": region_value,
            },
        });
    }
    if !secrets.is_empty() {
        container["Secrets"] = Value::Array(
            secrets.iter().map(SecretReference::to_container_secret).collect(),
        );
    }

    let mut task_properties = json!({
        "Family": deployment.namer().logical_id("DefaultTaskDef"),
        "ExecutionRoleArn": get_att(&execution_role, "Arn"),
        "TaskRoleArn": get_att(&task_role, "Arn"),
        "ContainerDefinitions": [container],
    });
    if variant.uses_ec2() {
        task_properties["NetworkMode"] = json!("bridge");
        task_properties["RequiresCompatibilities"] = json!(["EC2"]);
    } else {
        task_properties["NetworkMode"] = json!("awsvpc");
        task_properties["RequiresCompatibilities"] = json!(["FARGATE"]);
        task_properties["Cpu"] = json!(TASK_CPU.to_string());
        task_properties["Memory"] = json!(TASK_MEMORY_MIB.to_string());
    }
    let task_definition = template.add_resource(
        "DefaultTaskDef",
        Resource::new("AWS::ECS::TaskDefinition", task_properties),
    )?;

    // Service
    let mut service_properties = json!({
        "Cluster": reference(&cluster),
        "TaskDefinition": reference(&task_definition),
        "DesiredCount": sizing.desired_count,
        "DeploymentConfiguration": { "MaximumPercent": 200, "MinimumHealthyPercent": 50 },
        "EnableECSManagedTags": false,
        "Tags": [tag("berth:deployment", deployment.namer().prefix())],
    });
    if variant.uses_ec2() {
        service_properties["LaunchType"] = json!("EC2");
        service_properties["SchedulingStrategy"] = json!("REPLICA");
    } else {
        service_properties["LaunchType"] = json!("FARGATE");
        service_properties["NetworkConfiguration"] = json!({
            "AwsvpcConfiguration": {
                "AssignPublicIp": "DISABLED",
                "SecurityGroups": [get_att(&security_group, "GroupId")],
                "Subnets": network.subnet_refs(Tier::Private),
            },
        });
    }
    let mut service =
        Resource::new("AWS::ECS::Service", service_properties).depends_on(execution_policy);
    // Instances must be registering before tasks can be placed on them.
    if let Some((auto_scaling_group, _)) = &capacity {
        service = service.depends_on(auto_scaling_group.clone());
    }
    let service = template.add_resource("DefaultService", service)?;

    debug!(
        service = %service,
        launch = if variant.uses_ec2() { "EC2" } else { "FARGATE" },
        desired = sizing.desired_count,
        secrets = secrets.len(),
        "compute declared"
    );

    Ok(Compute {
        cluster,
        service,
        security_group,
        log_group,
        launch: if capacity.is_some() {
            Launch::Ec2
        } else {
            Launch::Fargate
        },
    })
}
