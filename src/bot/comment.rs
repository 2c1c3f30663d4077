use std::time::Duration;

use crate::utils::text::natural_delta;

/// Warning posted on a pull request without new commits for a while.
/// `{pasttime}` and `{futuretime}` are replaced with human readable durations.
pub const PRS_CLOSE_WARNING: &str = "Hi humans :wave: - this pull request hasn't had any new \
commits for approximately {pasttime}. **I plan to close this in {futuretime} if the pull \
request doesn't have any new commits by then.**

In lieu of a stalled pull request, please consider closing this and open an issue instead if \
a reminder is needed to revisit in the future. Maintainers may also choose to add \
**keep-open** label to keep this PR open but it is discouraged unless absolutely necessary.

If this PR still needs to be reviewed, as an author, you can rebase it to reset the clock.

*If you believe I commented on this pull request incorrectly, please report this to the \
maintainers of the bot.*";

/// Comment posted right before a stale pull request is closed.
pub const PRS_CLOSE_EPILOGUE: &str = "I'm going to close this pull request as per my previous \
message. If you think what is being added/fixed here is still important, please remember to \
open an issue to keep track of it. Thanks!

*If this is the first time I am commenting on this issue, or if you believe I closed this \
issue incorrectly, please report this to the maintainers of the bot.*";

/// Identifies the kind of a comment posted by the bot, so that it can be found later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentMarker {
    StalePrWarning,
    StalePrEpilogue,
}

impl CommentMarker {
    /// Invisible HTML comment appended to the comment body.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentMarker::StalePrWarning => "<!-- changebot: stale-pr-warning -->",
            CommentMarker::StalePrEpilogue => "<!-- changebot: stale-pr-epilogue -->",
        }
    }

    pub fn is_present_in(&self, body: &str) -> bool {
        body.contains(self.as_str())
    }
}

/// A comment that can be posted to a pull request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    text: String,
    marker: Option<CommentMarker>,
}

impl Comment {
    pub fn new(text: String) -> Self {
        Self { text, marker: None }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn marker(&self) -> Option<CommentMarker> {
        self.marker
    }

    pub fn render(&self) -> String {
        match self.marker {
            Some(marker) => format!("{}\n{}", self.text, marker.as_str()),
            None => self.text.clone(),
        }
    }
}

/// `pasttime` is the inactivity after which the warning is posted, `futuretime` is how much
/// longer the pull request has before it gets closed.
pub fn stale_pr_warning_comment(warn_after: Duration, close_after: Duration) -> Comment {
    let futuretime = close_after.saturating_sub(warn_after);
    Comment {
        text: PRS_CLOSE_WARNING
            .replace("{pasttime}", &natural_delta(warn_after))
            .replace("{futuretime}", &natural_delta(futuretime)),
        marker: Some(CommentMarker::StalePrWarning),
    }
}

pub fn stale_pr_epilogue_comment() -> Comment {
    Comment {
        text: PRS_CLOSE_EPILOGUE.to_string(),
        marker: Some(CommentMarker::StalePrEpilogue),
    }
}
