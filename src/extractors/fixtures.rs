//! Synthetic post markup for tests, shaped like the site's two layouts.

pub const HOME_URL: &str = "https://twitter.com/home";
pub const DETAIL_URL: &str = "https://twitter.com/alice/status/1552";

#[derive(Debug, Clone)]
pub struct QuoteFixture {
    pub display_name: &'static str,
    pub handle: &'static str,
    pub datetime: &'static str,
    pub body: Option<&'static str>,
    pub video: bool,
    pub image: bool,
    pub thread: bool,
}

impl Default for QuoteFixture {
    fn default() -> Self {
        Self {
            display_name: "Carol",
            handle: "carol",
            datetime: "2022-07-20T10:00:00.000Z",
            body: Some("original take"),
            video: false,
            image: false,
            thread: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostFixture {
    pub display_name: &'static str,
    pub handle: &'static str,
    pub verified: bool,
    /// Inner markup of the body marker; `None` renders no body at all.
    pub body: Option<&'static str>,
    pub status_path: &'static str,
    /// `None` renders no timestamp link, like a promoted post.
    pub datetime: Option<&'static str>,
    pub display_time: &'static str,
    pub detail_time: &'static str,
    pub social_context: Option<&'static str>,
    pub replying_to: Option<&'static str>,
    pub card: bool,
    pub quote: Option<QuoteFixture>,
    pub thread: bool,
    pub promoted: bool,
    pub video: bool,
    pub image: bool,
    /// Timeline action labels; `None` omits the action element.
    pub reply: Option<&'static str>,
    pub retweet: Option<&'static str>,
    pub like: Option<&'static str>,
    /// Detail engagement link labels.
    pub engagement: Vec<&'static str>,
}

impl Default for PostFixture {
    fn default() -> Self {
        Self {
            display_name: "Alice",
            handle: "alice",
            verified: false,
            body: Some("Shipping the parser today"),
            status_path: "/alice/status/1552",
            datetime: Some("2022-07-27T15:45:00.000Z"),
            display_time: "Jul 27",
            detail_time: "3:45 PM · Jul 27, 2022",
            social_context: None,
            replying_to: None,
            card: false,
            quote: None,
            thread: false,
            promoted: false,
            video: false,
            image: false,
            reply: Some("12"),
            retweet: Some("1.2K"),
            like: Some("3M"),
            engagement: vec!["5 Retweets", "2 Quote Tweets", "1,024 Likes"],
        }
    }
}

impl PostFixture {
    pub fn timeline_html(&self) -> String {
        let timestamp = self
            .datetime
            .map(|dt| {
                format!(
                    r#"<span>·</span><a role="link" href="{}"><time datetime="{dt}">{}</time></a>"#,
                    self.status_path, self.display_time
                )
            })
            .unwrap_or_default();

        let mut actions = String::new();
        let labels = [
            ("reply", self.reply),
            ("retweet", self.retweet),
            ("like", self.like),
        ];
        for (testid, label) in labels {
            if let Some(label) = label {
                actions.push_str(&format!(
                    r#"<div data-testid="{testid}"><span>{label}</span></div>"#
                ));
            }
        }

        format!(
            r#"<article data-testid="tweet" role="article"><div><div><div><div>{social}</div><div>{avatar}<div><div>{names}{timestamp}</div><div>{reply}{body}{attachments}</div><div role="group">{actions}</div>{promoted}</div></div></div></div></div></article>"#,
            social = self.social_html(),
            avatar = self.avatar_column(),
            names = self.name_links(),
            reply = self.reply_html(),
            body = self.body_html(),
            attachments = self.attachments_html(),
            promoted = self.promoted_html(),
        )
    }

    pub fn detail_html(&self) -> String {
        let engagement: String = self
            .engagement
            .iter()
            .map(|&label| {
                let (count, word) = label.split_once(' ').unwrap_or((label, ""));
                format!(
                    r#"<a role="link" href="{}/{}"><span>{count}</span> {word}</a>"#,
                    self.status_path,
                    word.to_lowercase().replace(' ', "_")
                )
            })
            .collect();

        format!(
            r#"<article data-testid="tweet" role="article" tabindex="-1"><div><div><div><div>{social}</div><div>{avatar}<div>{names}</div></div><div>{reply}{body}{attachments}<div><a role="link" href="{status}"><span>{time}</span></a><span>·</span><span>Twitter Web App</span></div><div role="group">{engagement}</div><div role="group"><div data-testid="reply"></div><div data-testid="retweet"></div><div data-testid="like"></div></div>{promoted}</div></div></div></div></article>"#,
            social = self.social_html(),
            avatar = self.avatar_column(),
            names = self.name_links(),
            reply = self.reply_html(),
            body = self.body_html(),
            attachments = self.attachments_html(),
            status = self.status_path,
            time = self.detail_time,
            promoted = self.promoted_html(),
        )
    }

    /// Detail post followed by `replies` rendered replies inside a region.
    pub fn detail_page_html(&self, replies: usize) -> String {
        let mut html = format!(r#"<div role="region"><div>{}</div>"#, self.detail_html());
        for i in 0..replies {
            html.push_str(&format!(
                r#"<div><article data-testid="tweet"><div><span>reply {i}</span></div></article></div>"#
            ));
        }
        html.push_str("</div>");
        html
    }

    /// Avatar link nested eight levels deep; the thread line follows the
    /// outermost wrapper.
    fn avatar_column(&self) -> String {
        let mut html = String::from("<div>");
        html.push_str(&"<div>".repeat(8));
        html.push_str(&format!(
            r#"<a role="link" href="/{h}"><img src="https://pbs.twimg.com/profile_images/{h}.jpg"></a>"#,
            h = self.handle
        ));
        html.push_str(&"</div>".repeat(8));
        if self.thread {
            html.push_str(r#"<div class="thread-line"></div>"#);
        }
        html.push_str("</div>");
        html
    }

    fn name_links(&self) -> String {
        let badge = if self.verified {
            r#"<svg aria-label="Verified account"></svg>"#
        } else {
            ""
        };
        format!(
            r#"<a role="link" href="/{h}"><span>{name}</span>{badge}</a><a role="link" href="/{h}"><span>@{h}</span></a>"#,
            h = self.handle,
            name = self.display_name,
        )
    }

    fn social_html(&self) -> String {
        self.social_context
            .map(|actor| {
                format!(
                    r#"<div><div data-testid="socialContext"><span>{actor}</span> Retweeted</div></div>"#
                )
            })
            .unwrap_or_default()
    }

    fn reply_html(&self) -> String {
        self.replying_to
            .map(|h| format!(r#"<div>Replying to <a role="link" href="/{h}">@{h}</a></div>"#))
            .unwrap_or_default()
    }

    fn body_html(&self) -> String {
        self.body
            .map(|b| format!(r#"<div><div data-testid="tweetText" lang="en">{b}</div></div>"#))
            .unwrap_or_default()
    }

    fn attachments_html(&self) -> String {
        let mut html = String::new();
        if self.card {
            html.push_str(
                r#"<div data-testid="card.wrapper"><a role="link" href="https://t.co/card"><div><img src="https://pbs.twimg.com/card_img/1.jpg"></div><span>example.com</span><span>·</span><span>Example title</span><span>·</span><span>Example description</span></a></div>"#,
            );
        }
        if let Some(quote) = &self.quote {
            html.push_str(&quote.html());
        }
        if self.video {
            html.push_str(r#"<div aria-label="Embedded video"></div>"#);
        }
        if self.image {
            html.push_str(
                r#"<div aria-label="Image"><img src="https://pbs.twimg.com/media/1.jpg"></div>"#,
            );
        }
        html
    }

    fn promoted_html(&self) -> String {
        if self.promoted {
            "<div><div><span>Promoted</span></div></div>".to_string()
        } else {
            String::new()
        }
    }
}

impl QuoteFixture {
    fn html(&self) -> String {
        let mut extras = String::new();
        if self.video {
            extras.push_str(r#"<div aria-label="Embedded video"></div>"#);
        }
        if self.image {
            extras.push_str(r#"<div aria-label="Image"></div>"#);
        }
        if self.thread {
            extras.push_str("<div><span>Show this thread</span></div>");
        }
        let body = self
            .body
            .map(|b| format!(r#"<div data-testid="tweetText">{b}</div>"#))
            .unwrap_or_default();

        format!(
            r#"<div role="link" tabindex="0"><div><div data-testid="UserAvatar-Container-unknown"><img src="https://pbs.twimg.com/profile_images/{h}.jpg"></div><div><span>{name}</span><span>·</span><span>@{h}</span><span><time datetime="{dt}">Jul 20</time></span></div>{body}{extras}</div></div>"#,
            h = self.handle,
            name = self.display_name,
            dt = self.datetime,
        )
    }
}
