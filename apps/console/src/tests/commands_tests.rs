use super::*;

fn parsed(line: &str) -> ConsoleCommand {
    ConsoleCommand::parse(line)
        .expect("parse")
        .expect("non-blank line")
}

#[test]
fn blank_lines_are_skipped() {
    assert_eq!(ConsoleCommand::parse("   ").expect("parse"), None);
}

#[test]
fn go_takes_a_single_path() {
    assert_eq!(
        parsed("go /agent/acknowledgment/20240001234567"),
        ConsoleCommand::Go {
            path: "/agent/acknowledgment/20240001234567".into()
        }
    );
    assert!(ConsoleCommand::parse("go").is_err());
}

#[test]
fn login_needs_id_and_otp() {
    assert_eq!(
        parsed("LOGIN AID1 123456"),
        ConsoleCommand::AgentLogin {
            agent_id: "AID1".into(),
            otp: "123456".into()
        }
    );
    let err = ConsoleCommand::parse("login AID1").expect_err("missing otp");
    assert!(err.to_string().contains("usage: login"));
}

#[test]
fn signup_fields_are_pipe_separated() {
    let command = parsed("signup Ravi Kumar | 9876543210 | ravi@example.com | secret1 | secret1");
    assert_eq!(
        command,
        ConsoleCommand::Signup(SignupForm {
            name: "Ravi Kumar".into(),
            mobile: "9876543210".into(),
            email: "ravi@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        })
    );
    assert!(ConsoleCommand::parse("signup Ravi|987").is_err());
}

#[test]
fn submit_fills_optional_details_and_documents() {
    let ConsoleCommand::Submit(form) =
        parsed("submit Sita Devi|9000000001|Village Road|123412341234|ABCDE1234F|two acres|aadhaar.pdf, pan.pdf")
    else {
        panic!("expected submit");
    };
    assert_eq!(form.farmer_name, "Sita Devi");
    assert_eq!(form.other_details, "two acres");
    assert_eq!(form.document_references, vec!["aadhaar.pdf", "pan.pdf"]);

    let ConsoleCommand::Submit(minimal) = parsed("submit A|1|B|2|C") else {
        panic!("expected submit");
    };
    assert!(minimal.other_details.is_empty());
    assert!(minimal.document_references.is_empty());
}

#[test]
fn create_agent_password_is_optional() {
    assert_eq!(
        parsed("create-agent Asha|9111111111|asha@example.com|"),
        ConsoleCommand::CreateAgent {
            name: "Asha".into(),
            mobile: "9111111111".into(),
            email: "asha@example.com".into(),
            password: None,
        }
    );
}

#[test]
fn approve_and_reject_target_a_record_kind() {
    assert_eq!(
        parsed("approve agent AID1"),
        ConsoleCommand::SetStatus {
            kind: RecordKind::Agent,
            id: "AID1".into(),
            status: Status::Approved,
        }
    );
    assert_eq!(
        parsed("reject app 20240001234567"),
        ConsoleCommand::SetStatus {
            kind: RecordKind::Application,
            id: "20240001234567".into(),
            status: Status::Rejected,
        }
    );
    let err = ConsoleCommand::parse("approve farmer X").expect_err("bad kind");
    assert!(err.to_string().contains("cannot approve `farmer`"));
}

#[test]
fn unknown_commands_point_at_help() {
    let err = ConsoleCommand::parse("dance").expect_err("unknown");
    assert!(err.to_string().contains("try `help`"));
    assert_eq!(parsed("exit"), ConsoleCommand::Quit);
    assert_eq!(parsed("search"), ConsoleCommand::Search { term: String::new() });
}
