#[cfg(test)]
mod tests {
    use minijinja::ErrorKind;
    use templater::error::Error;
    use templater::renderer::{Template, TemplateRenderer};
    use test_log::test;

    fn context(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn render(template: &Template, yaml: &str) -> String {
        String::from_utf8(template.execute(&context(yaml)).unwrap()).unwrap()
    }

    #[test]
    fn self_inclusion_stops_at_the_recursion_limit() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "loop" %}x{{ include("loop", {}) }}{% enddefine %}{{ include("loop", {}) }}"#,
        )
        .unwrap();

        let err = template.execute(&context("{}")).unwrap_err();
        assert!(matches!(err, Error::TemplateExecution { .. }));
        assert!(err.is_recursion_limit(), "unexpected error: {err}");

        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        let mut messages = Vec::new();
        while let Some(e) = current {
            messages.push(e.to_string());
            current = e.source();
        }
        assert!(messages.iter().any(|m| m.contains("nested reference name: loop")));
        assert_eq!(template.inclusion_guard().depth("loop"), 0);
    }

    #[test]
    fn inclusion_through_tpl_shares_the_counter() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "again" %}{{ tpl(src, {"src": src}) }}{% enddefine %}{{ include("again", {"src": src}) }}"#,
        )
        .unwrap();

        let err = template
            .execute(&context(r#"src: '{{ include("again", {"src": src}) }}'"#))
            .unwrap_err();
        assert!(err.is_recursion_limit(), "unexpected error: {err}");
        assert_eq!(template.inclusion_guard().depth("again"), 0);
    }

    #[test]
    fn bounded_recursion_walks_a_tree() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "node" %}{{ name }}({% for child in children %}{{ include("node", child) }}{% endfor %}){% enddefine %}{{ include("node", tree) }}"#,
        )
        .unwrap();

        let tree = r#"
tree:
  name: a
  children:
    - name: b
      children:
        - name: c
          children:
            - name: d
              children:
                - name: e
                  children: []
    - name: f
      children: []
"#;
        assert_eq!(render(&template, tree), "a(b(c(d(e())))f())");
        assert_eq!(template.inclusion_guard().depth("node"), 0);
    }

    #[test]
    fn lists_and_scalars_are_reachable_as_this() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "pkgs" %}RUN apt-get install{% for p in this %} {{ p }}{% endfor %}{% enddefine %}{% define "tag" %}:{{ this }}{% enddefine %}{{ include("pkgs", packages) }}{{ include("tag", version) }}"#,
        )
        .unwrap();
        assert_eq!(
            render(&template, "packages: [curl, git]\nversion: 12"),
            "RUN apt-get install curl git:12"
        );
    }

    #[test]
    fn tpl_exposes_list_data_as_this() {
        let template = Template::compile_str("Dockerfile.tpl", "{{ tpl(src, items) }}").unwrap();
        assert_eq!(render(&template, "src: '{{ this | join(\",\") }}'\nitems: [a, b]"), "a,b");
    }

    #[test]
    fn depth_is_restored_between_sibling_inclusions() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "leaf" %}[{{ v }}]{% enddefine %}{{ include("leaf", {"v": 1}) }}{{ include("leaf", {"v": 2}) }}"#,
        )
        .unwrap();
        assert_eq!(render(&template, "{}"), "[1][2]");
        assert_eq!(template.inclusion_guard().depth("leaf"), 0);
    }

    #[test]
    fn depth_is_restored_after_a_failing_inclusion() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "bad" %}{{ required("value is required", value) }}{% enddefine %}{{ include("bad", {}) }}"#,
        )
        .unwrap();

        for _ in 0..2 {
            let err = template.execute(&context("{}")).unwrap_err();
            assert!(!err.is_recursion_limit());
            assert_eq!(template.inclusion_guard().depth("bad"), 0);
        }
    }

    #[test]
    fn tpl_definitions_do_not_leak_into_the_parent() {
        let template =
            Template::compile_str("Dockerfile.tpl", r#"{{ tpl(src, {}) }}|{{ include("x", {}) }}"#)
                .unwrap();

        let err = template
            .execute(&context(r#"src: '{% define "x" %}X{% enddefine %}{{ include("x", {}) }}'"#))
            .unwrap_err();
        match err {
            Error::TemplateExecution { source, .. } => {
                assert_eq!(source.kind(), ErrorKind::TemplateNotFound)
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!template.has_template("x"));
    }

    #[test]
    fn tpl_sees_definitions_of_the_parent() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "greet" %}hi {{ who }}{% enddefine %}{{ tpl(src, {"who": "there"}) }}"#,
        )
        .unwrap();
        assert_eq!(render(&template, r#"src: '{{ include("greet", {"who": who}) }}!'"#), "hi there!");
    }

    #[test]
    fn tpl_strips_the_placeholder() {
        let template = Template::compile_str("Dockerfile.tpl", "[{{ tpl(src, {}) }}]").unwrap();
        assert_eq!(render(&template, "src: '{{ missingKey }}'"), "[]");
    }

    #[test]
    fn tpl_parse_errors_name_the_source() {
        let template = Template::compile_str("Dockerfile.tpl", "{{ tpl(src, {}) }}").unwrap();
        let err = template.execute(&context("src: '{{ broken'")).unwrap_err();
        match err {
            Error::TemplateExecution { source, .. } => {
                assert_eq!(source.kind(), ErrorKind::SyntaxError);
                assert!(source.to_string().contains("cannot parse template"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn include_statement_and_function_share_definitions() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            r#"{% define "labels" %}LABEL tag={{ image.tag }}{% enddefine %}{% include "labels" %} {{ include("labels", {"image": {"tag": "fn"}}) }}"#,
        )
        .unwrap();
        assert_eq!(render(&template, "image: {tag: stmt}"), "LABEL tag=stmt LABEL tag=fn");
    }

    #[test]
    fn to_yaml_is_available_in_templates() {
        let template = Template::compile_str(
            "Dockerfile.tpl",
            "LABEL config={{ toYaml(config) | quote }}",
        )
        .unwrap();
        assert_eq!(render(&template, "config: {a: 1}"), r#"LABEL config="a: 1""#);
    }
}
