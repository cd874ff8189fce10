//! Integration tests for the offline CLI commands

use std::process::Command;

/// Helper to run hpo command
fn hpo(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hpo"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute hpo")
}

mod write_command {
    use super::*;

    #[test]
    fn test_write_splits_primary_and_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let crd_dir = dir.path().join("templates");
        let dep_dir = dir.path().join("crds");

        let output = hpo(&[
            "crds",
            "write",
            "--crd-dir",
            crd_dir.to_str().unwrap(),
            "--crd-dep-dir",
            dep_dir.to_str().unwrap(),
        ]);

        assert!(output.status.success(), "Expected success writing CRDs");
        assert!(crd_dir.join("projecthelmcharts.yaml").is_file());
        for key in ["helmreleases", "helmcharts", "helmchartconfigs"] {
            assert!(dep_dir.join(format!("{key}.yaml")).is_file(), "missing {key}.yaml");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Wrote 4 file(s)"));
    }

    #[test]
    fn test_write_reports_failed_file_but_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let crd_dir = dir.path().join("templates");
        let dep_dir = dir.path().join("crds");
        std::fs::create_dir_all(dep_dir.join("helmcharts.yaml")).unwrap();

        let output = hpo(&[
            "crds",
            "write",
            "--crd-dir",
            crd_dir.to_str().unwrap(),
            "--crd-dep-dir",
            dep_dir.to_str().unwrap(),
        ]);

        assert!(output.status.success(), "Write failures should not fail the command");
        assert!(dep_dir.join("helmreleases.yaml").is_file());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("1 failed"));
    }
}

mod print_command {
    use super::*;

    #[test]
    fn test_print_to_stdout() {
        let output = hpo(&["crds", "print"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.matches("kind: CustomResourceDefinition").count(), 4);
        assert!(stdout.contains("name: projecthelmcharts.helm.cattle.io"));
    }

    #[test]
    fn test_print_dependencies_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let dep_file = dir.path().join("deps.yaml");

        let output = hpo(&["crds", "print", "--dep-output", dep_file.to_str().unwrap()]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.matches("kind: CustomResourceDefinition").count(), 1);

        let deps = std::fs::read_to_string(&dep_file).unwrap();
        assert_eq!(deps.matches("kind: CustomResourceDefinition").count(), 3);
        assert!(!deps.contains("projecthelmcharts"));
    }
}

mod list_command {
    use super::*;

    #[test]
    fn test_list_shows_groups() {
        let output = hpo(&["crds", "list"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("primary"));
        assert!(stdout.contains("locker-dependency"));
        assert!(stdout.contains("controller-dependency"));
        assert!(stdout.contains("helmchartconfigs.helm.cattle.io"));
        assert!(stdout.contains("owned by helm-locker"));
        assert!(stdout.contains("owned by helm-controller"));
    }
}

mod create_command {
    use super::*;

    /// Run `crds create` with no reachable cluster, so it stops at client setup
    fn create_without_cluster(envs: &[(&str, &str)]) -> std::process::Output {
        let home = tempfile::tempdir().unwrap();
        Command::new(env!("CARGO_BIN_EXE_hpo"))
            .args(["crds", "create", "--timeout", "1"])
            .env_remove("RUST_LOG")
            .env_remove("KUBERNETES_SERVICE_HOST")
            .env_remove("KUBERNETES_SERVICE_PORT")
            .env("HOME", home.path())
            .env("KUBECONFIG", home.path().join("missing-kubeconfig"))
            .envs(envs.iter().copied())
            .output()
            .expect("Failed to execute hpo")
    }

    #[test]
    fn test_detect_toggle_accepts_numeric_value() {
        let output = create_without_cluster(&[("DETECT_K3S_RKE2", "1")]);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("invalid value"), "unexpected parse error: {stderr}");
        assert_eq!(output.status.code(), Some(3), "expected a cluster error, got: {stderr}");
    }

    #[test]
    fn test_toggles_accept_free_form_values() {
        let output = create_without_cluster(&[
            ("DETECT_K3S_RKE2", "enabled"),
            ("UPDATE_CRDS", "yes"),
        ]);

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("invalid value"), "unexpected parse error: {stderr}");
        assert_eq!(output.status.code(), Some(3));
    }

    #[test]
    fn test_detect_toggle_disabled_by_falsey_value() {
        let output = create_without_cluster(&[("DETECT_K3S_RKE2", "off"), ("UPDATE_CRDS", "")]);

        assert_eq!(output.status.code(), Some(3));
    }
}
