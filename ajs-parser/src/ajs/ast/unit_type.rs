//! Unit type codes
//!
//!     The first value of `ty` names what a unit is. Most job codes have a recovery
//!     twin spelled with a leading `r` (`j`/`rj`, `pj`/`rp`, `evwj`/`revwj`). Codes
//!     this catalogue does not know are kept verbatim as [`UnitKind::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a unit is, independent of its recovery flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    JobGroup,
    ManagerJobGroup,
    Jobnet,
    RemoteJobnet,
    ManagerJobnet,
    JobnetConnector,
    UnixJob,
    PcJob,
    QueueJob,
    JudgmentJob,
    OrJob,
    EventReceptionJob,
    FileMonitoringJob,
    MailReceptionJob,
    MessageQueueReceptionJob,
    MsmqReceptionJob,
    LogFileMonitoringJob,
    EventLogMonitoringJob,
    IntervalControlJob,
    EventSendingJob,
    MailSendingJob,
    MessageQueueSendingJob,
    MsmqSendingJob,
    StatusReportingJob,
    LocalPowerControlJob,
    RemotePowerControlJob,
    CustomUnixJob,
    CustomPcJob,
    FlexibleJob,
    HttpConnectionJob,
    Other,
}

impl UnitKind {
    pub fn is_group(self) -> bool {
        matches!(self, UnitKind::JobGroup | UnitKind::ManagerJobGroup)
    }

    pub fn is_jobnet(self) -> bool {
        matches!(
            self,
            UnitKind::Jobnet | UnitKind::RemoteJobnet | UnitKind::ManagerJobnet
        )
    }

    pub fn is_job(self) -> bool {
        !(self.is_group()
            || self.is_jobnet()
            || matches!(self, UnitKind::JobnetConnector | UnitKind::Other))
    }
}

/// (code, kind, recovery)
const CATALOGUE: &[(&str, UnitKind, bool)] = &[
    ("g", UnitKind::JobGroup, false),
    ("mg", UnitKind::ManagerJobGroup, false),
    ("n", UnitKind::Jobnet, false),
    ("rn", UnitKind::Jobnet, true),
    ("rm", UnitKind::RemoteJobnet, false),
    ("rr", UnitKind::RemoteJobnet, true),
    ("mn", UnitKind::ManagerJobnet, false),
    ("nc", UnitKind::JobnetConnector, false),
    ("j", UnitKind::UnixJob, false),
    ("rj", UnitKind::UnixJob, true),
    ("pj", UnitKind::PcJob, false),
    ("rp", UnitKind::PcJob, true),
    ("qj", UnitKind::QueueJob, false),
    ("rq", UnitKind::QueueJob, true),
    ("jdj", UnitKind::JudgmentJob, false),
    ("rjdj", UnitKind::JudgmentJob, true),
    ("orj", UnitKind::OrJob, false),
    ("rorj", UnitKind::OrJob, true),
    ("evwj", UnitKind::EventReceptionJob, false),
    ("revwj", UnitKind::EventReceptionJob, true),
    ("flwj", UnitKind::FileMonitoringJob, false),
    ("rflwj", UnitKind::FileMonitoringJob, true),
    ("mlwj", UnitKind::MailReceptionJob, false),
    ("rmlwj", UnitKind::MailReceptionJob, true),
    ("mqwj", UnitKind::MessageQueueReceptionJob, false),
    ("rmqwj", UnitKind::MessageQueueReceptionJob, true),
    ("mswj", UnitKind::MsmqReceptionJob, false),
    ("rmswj", UnitKind::MsmqReceptionJob, true),
    ("lfwj", UnitKind::LogFileMonitoringJob, false),
    ("rlfwj", UnitKind::LogFileMonitoringJob, true),
    ("ntwj", UnitKind::EventLogMonitoringJob, false),
    ("rntwj", UnitKind::EventLogMonitoringJob, true),
    ("tmwj", UnitKind::IntervalControlJob, false),
    ("rtmwj", UnitKind::IntervalControlJob, true),
    ("evsj", UnitKind::EventSendingJob, false),
    ("revsj", UnitKind::EventSendingJob, true),
    ("mlsj", UnitKind::MailSendingJob, false),
    ("rmlsj", UnitKind::MailSendingJob, true),
    ("mqsj", UnitKind::MessageQueueSendingJob, false),
    ("rmqsj", UnitKind::MessageQueueSendingJob, true),
    ("mssj", UnitKind::MsmqSendingJob, false),
    ("rmssj", UnitKind::MsmqSendingJob, true),
    ("cmsj", UnitKind::StatusReportingJob, false),
    ("rcmsj", UnitKind::StatusReportingJob, true),
    ("pwlj", UnitKind::LocalPowerControlJob, false),
    ("rpwlj", UnitKind::LocalPowerControlJob, true),
    ("pwrj", UnitKind::RemotePowerControlJob, false),
    ("rpwrj", UnitKind::RemotePowerControlJob, true),
    ("cj", UnitKind::CustomUnixJob, false),
    ("rcj", UnitKind::CustomUnixJob, true),
    ("cpj", UnitKind::CustomPcJob, false),
    ("rcpj", UnitKind::CustomPcJob, true),
    ("fxj", UnitKind::FlexibleJob, false),
    ("rfxj", UnitKind::FlexibleJob, true),
    ("htpj", UnitKind::HttpConnectionJob, false),
    ("rhtpj", UnitKind::HttpConnectionJob, true),
];

/// A decoded `ty` code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitType {
    code: String,
    kind: UnitKind,
    recovery: bool,
}

impl UnitType {
    pub fn from_code(code: &str) -> Self {
        let (kind, recovery) = CATALOGUE
            .iter()
            .find(|(known, _, _)| *known == code)
            .map(|(_, kind, recovery)| (*kind, *recovery))
            .unwrap_or((UnitKind::Other, false));
        Self {
            code: code.to_string(),
            kind,
            recovery,
        }
    }

    /// Whether `code` is in the catalogue.
    pub fn is_known_code(code: &str) -> bool {
        CATALOGUE.iter().any(|(known, _, _)| *known == code)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn is_recovery(&self) -> bool {
        self.recovery
    }

    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    pub fn is_jobnet(&self) -> bool {
        self.kind.is_jobnet()
    }

    pub fn is_job(&self) -> bool {
        self.kind.is_job()
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
