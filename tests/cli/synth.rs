//! Tests for `berth synth`.

use crate::support::*;

#[test]
fn test_missing_all_vars_exits_one_per_var() {
    let t = Test::new();

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "Please `export THIS_DEPLOYMENT_ENV=` within your shell.");
    assert_stderr_contains(&output, "Please `export THIS_DEPLOYMENT_NAMESPACE=` within your shell.");
    assert_stderr_contains(&output, "Please `export THIS_DEPLOYMENT_DOMAINNAME=` within your shell.");
    assert_eq!(stderr(&output).matches("Please `export").count(), 3);
    assert!(t.written_templates().is_empty());
}

#[test]
fn test_missing_domain_declares_nothing() {
    let t = Test::with_vars(&[
        ("THIS_DEPLOYMENT_ENV", "dev"),
        ("THIS_DEPLOYMENT_NAMESPACE", "team1"),
    ]);

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "THIS_DEPLOYMENT_DOMAINNAME");
    assert_stderr_excludes(&output, "THIS_DEPLOYMENT_ENV=");
    assert!(stdout(&output).is_empty());
    assert!(!t.out_dir().exists());
}

#[test]
fn test_empty_var_counts_as_missing() {
    let t = Test::with_vars(&[
        ("THIS_DEPLOYMENT_ENV", "dev"),
        ("THIS_DEPLOYMENT_NAMESPACE", ""),
        ("THIS_DEPLOYMENT_DOMAINNAME", "example.com"),
    ]);

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "THIS_DEPLOYMENT_NAMESPACE");
}

#[test]
fn test_basic_writes_one_template() {
    let t = Test::basic();

    let output = t.synth("basic");
    assert_success(&output);
    assert_stdout_contains(&output, STACK_NAME);

    let templates = t.written_templates();
    assert_eq!(templates.len(), 1);
    assert!(templates[0].ends_with(format!("{}.template.json", STACK_NAME)));

    let template = t.read_template();
    assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
    assert_eq!(template["Resources"]["DevTeam1VPC"]["Type"], "AWS::EC2::VPC");
    assert_eq!(template["Resources"]["DevTeam1ALB"]["Properties"]["Scheme"], "internet-facing");
    assert_eq!(
        template["Resources"]["DefaultService"]["Properties"]["LaunchType"],
        "FARGATE"
    );
    assert_eq!(resources_of(&template, "AWS::EC2::Subnet").len(), 6);
    assert_eq!(resources_of(&template, "AWS::CertificateManager::Certificate").len(), 0);
}

#[test]
fn test_default_command_is_basic_synth() {
    let t = Test::basic();

    let output = t.cmd().output().unwrap();
    assert_success(&output);

    let template = t.read_template();
    assert_eq!(
        template["Resources"]["DefaultService"]["Properties"]["LaunchType"],
        "FARGATE"
    );
}

#[test]
fn test_custom_out_dir() {
    let t = Test::basic();

    let output = t
        .cmd()
        .args(["synth", "--out", "cdk.out"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t
        .dir
        .path()
        .join("cdk.out")
        .join(format!("{}.template.json", STACK_NAME))
        .exists());
}

#[test]
fn test_stdout_is_pure_json() {
    let t = Test::basic();

    let output = t.synth_stdout("basic");
    assert_success(&output);
    let template: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(template["Resources"].is_object());
    assert!(t.written_templates().is_empty());
}

#[test]
fn test_tls_outputs() {
    let t = Test::basic();

    let output = t.synth("tls");
    assert_success(&output);
    assert_stdout_contains(&output, "Visit https://mylaravel.example.com");
    assert_stdout_contains(
        &output,
        "Please setup a CNAME record mylaravel.example.com to <DevTeam1ALB.DNSName>",
    );
    assert!(!stdout(&output).contains("Fn::Join"));

    let template = t.read_template();
    let outputs = template["Outputs"].as_object().unwrap();
    assert_eq!(outputs.len(), 3);
    assert_eq!(
        outputs["DevTeam1AlbDnsName"]["Export"]["Name"],
        "DevTeam1AlbDnsName"
    );
    assert_eq!(
        outputs["DevTeam1ActionVisit"]["Value"],
        "Visit https://mylaravel.example.com"
    );

    let certs = resources_of(&template, "AWS::CertificateManager::Certificate");
    assert_eq!(certs.len(), 1);
    assert_eq!(
        certs[0].1["Properties"]["SubjectAlternativeNames"][0],
        "*.example.com"
    );

    let listener = &template["Resources"]["DevTeam1ALBListener"]["Properties"];
    assert_eq!(listener["Protocol"], "HTTPS");
    assert_eq!(listener["Port"], 443);
}

#[test]
fn test_secure_requires_extra_vars() {
    let t = Test::basic();

    let output = t.synth("secure");
    assert_exit_one(&output);
    for var in [
        "THIS_LOG_STREAM_PREFIX",
        "THIS_ECR_REPO_NAME",
        "APP_NAME",
        "THIS_AWS_KMS_KEY_ID",
    ] {
        assert_stderr_contains(&output, &format!("Please `export {}=`", var));
    }
    assert!(t.written_templates().is_empty());
}

#[test]
fn test_secure_secrets_wired() {
    let t = Test::secure();

    let output = t.synth("secure");
    assert_success(&output);

    let template = t.read_template();
    let container = &template["Resources"]["DefaultTaskDef"]["Properties"]["ContainerDefinitions"][0];
    let secrets = container["Secrets"].as_array().unwrap();
    assert_eq!(secrets.len(), 29);

    let db_host = secrets.iter().find(|s| s["Name"] == "DB_HOST").unwrap();
    assert_eq!(
        db_host["ValueFrom"]["Fn::Sub"],
        "arn:${AWS::Partition}:ssm:eu-west-1:123456789012:parameter/dev/shop/DB_HOST"
    );

    let parameters = template["Parameters"].as_object().unwrap();
    assert_eq!(
        parameters["DevTeam1SsmDBPASSWORDver"]["Default"],
        "/dev/shop/DB_PASSWORDver"
    );
    assert_eq!(
        parameters["DevTeam1SsmDBPASSWORDver"]["Type"],
        "AWS::SSM::Parameter::Value<String>"
    );

    assert_eq!(
        container["LogConfiguration"]["Options"]["awslogs-stream-prefix"],
        "shop"
    );
}

#[test]
fn test_config_file_overrides() {
    let t = Test::secure();
    t.write_config(SMALL_CONFIG);

    let output = t.synth("secure");
    assert_success(&output);

    let template = t.read_template();
    let container = &template["Resources"]["DefaultTaskDef"]["Properties"]["ContainerDefinitions"][0];
    assert_eq!(container["Secrets"].as_array().unwrap().len(), 3);
    assert_eq!(
        template["Resources"]["DefaultService"]["Properties"]["DesiredCount"],
        3
    );
    let target = &template["Resources"]["DefaultServiceTaskCountTarget"]["Properties"];
    assert_eq!(target["MinCapacity"], 2);
    assert_eq!(target["MaxCapacity"], 6);
}

#[test]
fn test_inverted_capacity_rejected() {
    let t = Test::basic();
    t.write_config("[service]\nmin_capacity = 8\nmax_capacity = 4\n");

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "invalid capacity: min 8, max 4");
    assert!(t.written_templates().is_empty());
}

#[test]
fn test_scaling_policies() {
    let t = Test::basic();
    assert_success(&t.synth("basic"));

    let template = t.read_template();
    let policies = resources_of(&template, "AWS::ApplicationAutoScaling::ScalingPolicy");
    assert_eq!(policies.len(), 2);

    let targets: Vec<f64> = policies
        .iter()
        .map(|(_, p)| {
            p["Properties"]["TargetTrackingScalingPolicyConfiguration"]["TargetValue"]
                .as_f64()
                .unwrap()
        })
        .collect();
    assert!(targets.contains(&50.0));
    assert!(targets.contains(&30.0));
}

#[test]
fn test_synth_is_deterministic() {
    let t = Test::secure();

    let first = t.synth_stdout("secure");
    let second = t.synth_stdout("secure");
    assert_success(&first);
    assert_eq!(stdout(&first), stdout(&second));
}

/// Every `*.template.json` anywhere under the test directory.
fn templates_under(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(templates_under(&path));
        } else if path.to_string_lossy().ends_with(".template.json") {
            found.push(path);
        }
    }
    found
}

#[test]
fn test_relative_kind_cannot_escape_out_dir() {
    let t = Test::with_vars(&[
        ("THIS_DEPLOYMENT_ENV", ".."),
        ("THIS_DEPLOYMENT_NAMESPACE", "/"),
        ("THIS_DEPLOYMENT_DOMAINNAME", "example.com"),
    ]);

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "invalid THIS_DEPLOYMENT_ENV '..'");
    assert!(templates_under(t.dir.path()).is_empty());
    assert!(!t.out_dir().exists());
}

#[test]
fn test_namespace_with_separator_rejected() {
    let t = Test::with_vars(&[
        ("THIS_DEPLOYMENT_ENV", "dev"),
        ("THIS_DEPLOYMENT_NAMESPACE", "team/1"),
        ("THIS_DEPLOYMENT_DOMAINNAME", "example.com"),
    ]);

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "invalid THIS_DEPLOYMENT_NAMESPACE 'team/1'");
    assert_stderr_excludes(&output, "io error");
    assert!(templates_under(t.dir.path()).is_empty());
}
