//! Service autoscaling.
//!
//! Bounds the service's desired count and tracks two targets: average CPU
//! utilization and requests per target behind the load balancer.

use serde_json::json;
use tracing::debug;

use crate::core::config::ServiceConfig;
use crate::core::constants::{CPU_TARGET_PERCENT, REQUESTS_PER_TARGET};
use crate::core::stack::compute::Compute;
use crate::core::stack::edge::Edge;
use crate::core::template::intrinsic::{get_att, join, reference, sub};
use crate::core::template::{Resource, Template};
use crate::core::types::LogicalId;
use crate::error::{Result, SynthError};

/// Handles to the declared scaling resources.
#[derive(Debug, Clone)]
pub struct Scaling {
    pub target: LogicalId,
    pub policies: Vec<LogicalId>,
}

/// Check scaling bounds.
///
/// # Errors
///
/// Returns `SynthError::InvalidCapacity` unless `1 <= min <= max`.
pub fn check_capacity(min: u32, max: u32) -> Result<()> {
    if min == 0 || min > max {
        return Err(SynthError::InvalidCapacity { min, max }.into());
    }
    Ok(())
}

fn target_tracking(target: &str, name: &str, metric: serde_json::Value, value: f64) -> Resource {
    Resource::new(
        "AWS::ApplicationAutoScaling::ScalingPolicy",
        json!({
            "PolicyName": name,
            "PolicyType": "TargetTrackingScaling",
            "ScalingTargetId": reference(target),
            "TargetTrackingScalingPolicyConfiguration": {
                "PredefinedMetricSpecification": metric,
                "TargetValue": value,
            },
        }),
    )
}

/// Attach capacity bounds and the CPU and request-rate policies.
pub fn declare(
    template: &mut Template,
    sizing: &ServiceConfig,
    compute: &Compute,
    edge: &Edge,
) -> Result<Scaling> {
    check_capacity(sizing.min_capacity, sizing.max_capacity)?;

    let target = template.add_resource(
        "DefaultServiceTaskCountTarget",
        Resource::new(
            "AWS::ApplicationAutoScaling::ScalableTarget",
            json!({
                "MinCapacity": sizing.min_capacity,
                "MaxCapacity": sizing.max_capacity,
                "ResourceId": join("", vec![
                    json!("service/"),
                    reference(&compute.cluster),
                    json!("/"),
                    get_att(&compute.service, "Name"),
                ]),
                "RoleARN": sub(
                    "arn:${AWS::Partition}:iam::${AWS::AccountId}:role/aws-service-role/ecs.application-autoscaling.amazonaws.com/AWSServiceRoleForApplicationAutoScaling_ECSService",
                ),
                "ScalableDimension": "ecs:service:DesiredCount",
                "ServiceNamespace": "ecs",
            }),
        ),
    )?;

    let cpu = template.add_resource(
        "DefaultServiceTaskCountTargetCpuScaling",
        target_tracking(
            &target,
            "CpuScaling",
            json!({ "PredefinedMetricType": "ECSServiceAverageCPUUtilization" }),
            CPU_TARGET_PERCENT,
        ),
    )?;

    let requests = template.add_resource(
        "DefaultServiceTaskCountTargetRequestScaling",
        target_tracking(
            &target,
            "RequestScaling",
            json!({
                "PredefinedMetricType": "ALBRequestCountPerTarget",
                "ResourceLabel": join("", vec![
                    get_att(&edge.load_balancer, "LoadBalancerFullName"),
                    json!("/"),
                    get_att(&edge.target_group, "TargetGroupFullName"),
                ]),
            }),
            REQUESTS_PER_TARGET,
        ),
    )?;

    debug!(
        min = sizing.min_capacity,
        max = sizing.max_capacity,
        "autoscaling declared"
    );

    Ok(Scaling {
        target,
        policies: vec![cpu, requests],
    })
}
