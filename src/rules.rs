//! Ordered rule table mapping AWS error signals to failure categories.
//!
//! Rules are data: each [`Rule`] is a conjunction of optional constraints over
//! the error code, action, message, HTTP status and error kind. Rules are
//! grouped by category and groups are evaluated strictly in table order, so a
//! failure matching rules of two groups resolves to the earlier group.
//!
//! Evaluation order of [`SERVICE_RULES`]:
//! 1. `NO_ACCESS`
//! 2. `THROTTLING`
//! 3. `SERVICE_DISABLED`
//! 4. `OBJECT_NOT_FOUND`
//! 5. `TEMPORARY_ERROR`
//!
//! Several rules are deliberately broad and rely on being checked late. The
//! table encodes observed vendor behavior; entries tied to one action name are
//! quirks of that API, not logic to be generalized.
//!
//! All comparisons are case-sensitive and null-safe: an absent error code or
//! message never satisfies a code or message constraint.

use crate::core_types::{Category, CauseKind, ClientFailure, ErrorKind, ServiceFailure};
use std::fmt;

const BAD_GATEWAY: u16 = 502;
const SERVICE_UNAVAILABLE: u16 = 503;
const GATEWAY_TIMEOUT: u16 = 504;

/// The fields of a service failure the rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationInput<'a> {
    pub error_code: Option<&'a str>,
    pub error_message: Option<&'a str>,
    pub status_code: u16,
    pub error_kind: ErrorKind,
    pub action: &'a str,
}

impl<'a> ClassificationInput<'a> {
    pub fn from_service(failure: &'a ServiceFailure, action: &'a str) -> Self {
        Self {
            error_code: failure.error_code.as_deref(),
            error_message: failure.error_message.as_deref(),
            status_code: failure.status_code,
            error_kind: failure.error_kind,
            action,
        }
    }
}

/// A declarative predicate over a [`ClassificationInput`].
///
/// Every constraint that is set must hold. Build rules with the `const`
/// constructors; a rule always constrains at least one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    code: Option<&'static str>,
    action: Option<&'static str>,
    message_prefix: Option<&'static str>,
    message_contains: &'static [&'static str],
    status_codes: &'static [u16],
    error_kind: Option<ErrorKind>,
}

impl Rule {
    const UNCONSTRAINED: Rule = Rule {
        code: None,
        action: None,
        message_prefix: None,
        message_contains: &[],
        status_codes: &[],
        error_kind: None,
    };

    /// Exact error code match.
    pub const fn code(code: &'static str) -> Self {
        Self {
            code: Some(code),
            ..Self::UNCONSTRAINED
        }
    }

    /// Exact action match, for services that answer without a structured code.
    pub const fn action(action: &'static str) -> Self {
        Self {
            action: Some(action),
            ..Self::UNCONSTRAINED
        }
    }

    /// Error kind match.
    pub const fn kind(kind: ErrorKind) -> Self {
        Self {
            error_kind: Some(kind),
            ..Self::UNCONSTRAINED
        }
    }

    pub const fn for_action(self, action: &'static str) -> Self {
        Self {
            action: Some(action),
            ..self
        }
    }

    pub const fn starting_with(self, prefix: &'static str) -> Self {
        Self {
            message_prefix: Some(prefix),
            ..self
        }
    }

    /// The message must contain every one of `needles`.
    pub const fn containing(self, needles: &'static [&'static str]) -> Self {
        Self {
            message_contains: needles,
            ..self
        }
    }

    /// The HTTP status must be one of `status_codes`.
    pub const fn with_status(self, status_codes: &'static [u16]) -> Self {
        Self {
            status_codes,
            ..self
        }
    }

    pub fn matches(&self, input: &ClassificationInput<'_>) -> bool {
        if let Some(code) = self.code {
            if input.error_code != Some(code) {
                return false;
            }
        }
        if let Some(action) = self.action {
            if input.action != action {
                return false;
            }
        }
        if let Some(kind) = self.error_kind {
            if input.error_kind != kind {
                return false;
            }
        }
        if !self.status_codes.is_empty() && !self.status_codes.contains(&input.status_code) {
            return false;
        }
        if self.message_prefix.is_none() && self.message_contains.is_empty() {
            return true;
        }

        let Some(message) = input.error_message else {
            return false;
        };
        if let Some(prefix) = self.message_prefix {
            if !message.starts_with(prefix) {
                return false;
            }
        }
        self.message_contains
            .iter()
            .all(|needle| message.contains(*needle))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(code) = self.code {
            parts.push(format!("code={code}"));
        }
        if let Some(action) = self.action {
            parts.push(format!("action={action}"));
        }
        if let Some(kind) = self.error_kind {
            parts.push(format!("kind={kind:?}"));
        }
        if !self.status_codes.is_empty() {
            parts.push(format!("status={:?}", self.status_codes));
        }
        if let Some(prefix) = self.message_prefix {
            parts.push(format!("message^={prefix:?}"));
        }
        if !self.message_contains.is_empty() {
            parts.push(format!("message~={:?}", self.message_contains));
        }
        f.write_str(&parts.join(" "))
    }
}

/// The rules that map to one category, evaluated as a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleGroup {
    pub category: Category,
    pub rules: &'static [Rule],
}

impl RuleGroup {
    pub fn find(&self, input: &ClassificationInput<'_>) -> Option<&'static Rule> {
        self.rules.iter().find(|rule| rule.matches(input))
    }
}

/// Rule groups in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTable {
    groups: &'static [RuleGroup],
}

impl RuleTable {
    pub const fn new(groups: &'static [RuleGroup]) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &'static [RuleGroup] {
        self.groups
    }

    pub fn group(&self, category: Category) -> Option<&'static RuleGroup> {
        self.groups.iter().find(|group| group.category == category)
    }

    /// First matching rule across all groups, with its group's category.
    pub fn evaluate(&self, input: &ClassificationInput<'_>) -> Option<(Category, &'static Rule)> {
        self.groups
            .iter()
            .find_map(|group| group.find(input).map(|rule| (group.category, rule)))
    }
}

const NO_ACCESS_RULES: &[Rule] = &[
    Rule::code("AccessDeniedException"),
    Rule::code("AccessDenied"),
    Rule::code("AuthFailure"),
    Rule::code("UnauthorizedOperation"),
    Rule::code("AuthorizationError"),
    Rule::code("UnrecognizedClientException"),
    Rule::code("InsufficientPrivilegesException"),
    Rule::code("InvalidClientTokenId"),
    Rule::code("InvalidAccessKeyId"),
    Rule::code("FailedResourceAccessException"),
    // Elastic Beanstalk wraps access errors in a validation code
    Rule::code("InvalidParameterValue").starting_with("Access Denied"),
    Rule::code("InvalidParameterValue").containing(&["is not authorized to perform"]),
];

const THROTTLING_RULES: &[Rule] = &[
    Rule::code("Throttling"),
    Rule::code("ThrottlingException"),
    Rule::code("TooManyRequestsException"),
    Rule::code("RequestLimitExceeded"),
    Rule::code("LimitExceededException"),
    Rule::code("RequestThrottled"),
];

const SERVICE_DISABLED_RULES: &[Rule] = &[
    Rule::code("SubscriptionRequiredException"),
    Rule::code("NotSignedUp"),
    Rule::code("OptInRequired"),
    // ElastiCache: "Use of cache security groups is not permitted in this API version
    // for your account."
    Rule::code("InvalidParameterValue").containing(&["not permitted in this API version"]),
    // EC2 reserved instances for AISPL customers
    Rule::code("UnsupportedOperation")
        .containing(&["Amazon Internet Services Private Limited (AISPL)"]),
    Rule::code("InvalidParameterValue").starting_with(
        "Starting August 1 2017, you won't be able to view or manage (except terminate) \
         Elastic Beanstalk environments running legacy platforms",
    ),
    Rule::code("AWSOrganizationsNotInUseException"),
    Rule::code("UnsupportedOperation")
        .containing(&["The operation is not supported in this region!"]),
    Rule::code("UnsupportedOperation").for_action("ec2:DescribeCustomerGateways"),
    Rule::code("UnsupportedOperation").for_action("ec2:DescribeVpnConnections"),
    Rule::code("UnknownOperationException").for_action("dynamodb:ListGlobalTables"),
    Rule::code("InvalidParameterValue").containing(&["Backtrack is not"]),
    Rule::code("DeploymentNotStartedException"),
    Rule::code("OperationNotPermitted").for_action("ec2:DescribeEgressOnlyInternetGateways"),
    Rule::code("ValidationError").for_action("cloudformation:ListStackSets"),
];

const OBJECT_NOT_FOUND_RULES: &[Rule] = &[
    Rule::code("InvalidNetworkInterfaceID"),
    Rule::code("InvalidGatewayRequestException"),
    Rule::code("NoSuchEntity"),
    Rule::code("NoSuchHostedZone"),
    // RDS: "Unable to find a snapshot matching the resource name: ..."
    Rule::code("InvalidParameterValue").containing(&["Unable to find"]),
    Rule::code("InvalidParameterValue").containing(&["No Environment found for EnvironmentName"]),
    Rule::code("InvalidParameterValue").containing(&["No Environment found for EnvironmentId"]),
    Rule::code("InvalidRequestException").containing(&["Cluster", "was not found"]),
    Rule::code("InvalidRequestException").containing(&["Cluster", "is not valid"]),
    Rule::code("InvalidRequestException").containing(&["Step", "was not found"]),
    Rule::code("AWS.SimpleQueueService.NonExistentQueue"),
    Rule::code("EntityDoesNotExistException"),
    Rule::code("RepositoryDoesNotExistException"),
    Rule::code("InvalidInstanceID.NotFound"),
    Rule::code("InvalidSnapshot.NotFound"),
    Rule::code("LoadBalancerNotFound"),
    Rule::code("DBInstanceNotFound"),
    Rule::code("CacheClusterNotFound"),
    Rule::code("FileSystemNotFound"),
    Rule::code("ResourceNotFoundException"),
    Rule::code("NotFound"),
    Rule::code("NotFoundException"),
    Rule::code("NoSuchBucket"),
    Rule::code("NoSuchDistribution"),
    Rule::code("NoSuchConfigRuleException"),
    Rule::code("TrailNotFoundException"),
    Rule::code("MountTargetNotFound"),
    Rule::code("ListenerNotFound"),
    Rule::code("ResourceNotFound"),
    Rule::code("TargetGroupNotFound"),
    Rule::code("ValidationError")
        .starting_with("Stack with id")
        .containing(&["does not exist"]),
    Rule::code("ValidationError")
        .starting_with("Group")
        .containing(&["not found"]),
    Rule::code("PipelineDeletedException"),
    Rule::code("PipelineNotFoundException"),
    // Directory Service reports deletion through a generic client code
    Rule::code("ClientException")
        .for_action("ds:DescribeEventTopics")
        .containing(&["is in Deleting state"]),
    Rule::code("ExecutionDoesNotExist"),
    Rule::code("DeploymentDoesNotExistException"),
    Rule::code("InvalidVpcID.NotFound"),
    Rule::code("ConfigurationSetDoesNotExist"),
    Rule::code("RuleSetDoesNotExist"),
    Rule::code("ValidationError").containing(&["AutoScalingGroup name not found"]),
    Rule::code("TableNotFoundException"),
    Rule::code("InvalidParameterValue").containing(&["DBInstance", "not found"]),
    Rule::code("StackSetNotFoundException"),
    Rule::code("DBSnapshotNotFound"),
    Rule::code("BackupNotFoundException"),
    Rule::code("NoSuchHealthCheck"),
    Rule::code("ClusterNotFound"),
    Rule::code("DBClusterNotFoundFault"),
    Rule::code("BranchDoesNotExistException"),
    Rule::code("WAFNonexistentItemException"),
    Rule::code("PipelineExecutionNotFoundException"),
    Rule::code("InvalidParameterValue").containing(&[":elasticbeanstalk:", "does not exist"]),
    Rule::code("InvalidParameterValue").containing(&["No Solution Stack named"]),
    Rule::code("InvalidParameterValue")
        .containing(&["Unable to resolve Ref. No data on parameter value"]),
];

const TEMPORARY_ERROR_RULES: &[Rule] = &[
    Rule::code("ExpiredToken"),
    Rule::code("InternalFailure"),
    Rule::code("InternalError"),
    Rule::code("InternalServerError"),
    Rule::code("ServiceUnavailable"),
    Rule::code("ServerException"),
    Rule::code("503 Service Unavailable"),
    Rule::code("500 Internal Server Error"),
    Rule::code("ClientUnavailable"),
    Rule::code("DirectConnectServerException"),
    Rule::code("KMSInternalException"),
    Rule::code("InvalidParameterValue")
        .containing(&["Invalid Environment Configuration specification"]),
    Rule::code("HttpConnectionTimeoutException"),
    // Bare gateway errors without an error code
    Rule::action("lambda:ListFunctions").with_status(&[BAD_GATEWAY, GATEWAY_TIMEOUT]),
    Rule::action("ds:DescribeDirectories").with_status(&[BAD_GATEWAY, GATEWAY_TIMEOUT]),
    Rule::code("ClientException").containing(&["Could not get snapshot limits as directory"]),
    Rule::kind(ErrorKind::Unknown).with_status(&[SERVICE_UNAVAILABLE]),
    Rule::kind(ErrorKind::Unknown).with_status(&[GATEWAY_TIMEOUT]),
];

/// Rule table for service-side failures.
pub static SERVICE_RULES: RuleTable = RuleTable::new(&[
    RuleGroup {
        category: Category::NoAccess,
        rules: NO_ACCESS_RULES,
    },
    RuleGroup {
        category: Category::Throttling,
        rules: THROTTLING_RULES,
    },
    RuleGroup {
        category: Category::ServiceDisabled,
        rules: SERVICE_DISABLED_RULES,
    },
    RuleGroup {
        category: Category::ObjectNotFound,
        rules: OBJECT_NOT_FOUND_RULES,
    },
    RuleGroup {
        category: Category::TemporaryError,
        rules: TEMPORARY_ERROR_RULES,
    },
]);

/// A predicate over a client-side failure. Every match means `NETWORK_ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRule {
    /// The failure's own message contains the needle.
    MessageContains(&'static str),
    /// The cause chain starts with exactly these kinds, outermost first.
    CauseChain(&'static [CauseKind]),
}

impl ClientRule {
    pub fn matches(&self, failure: &ClientFailure, max_cause_depth: usize) -> bool {
        match self {
            Self::MessageContains(needle) => failure
                .message
                .as_deref()
                .is_some_and(|message| message.contains(*needle)),
            Self::CauseChain(expected) => {
                let mut chain = failure.causes(max_cause_depth).map(|cause| cause.kind);
                expected.iter().all(|kind| chain.next() == Some(*kind))
            }
        }
    }
}

impl fmt::Display for ClientRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageContains(needle) => write!(f, "message~={needle:?}"),
            Self::CauseChain(kinds) => write!(f, "causes={kinds:?}"),
        }
    }
}

/// Rules for client-side failures, all classifying as `NETWORK_ERROR`.
pub static CLIENT_RULES: &[ClientRule] = &[
    ClientRule::MessageContains("Read timed out"),
    ClientRule::MessageContains("Connection reset"),
    ClientRule::CauseChain(&[CauseKind::ConnectTimeout, CauseKind::SocketTimeout]),
    ClientRule::CauseChain(&[CauseKind::NoHttpResponse]),
    ClientRule::CauseChain(&[CauseKind::UnknownHost]),
];
