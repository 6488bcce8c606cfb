// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP route handlers.

pub mod health;
pub mod material;

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::Config;
    use crate::{build_router, AppState};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use ifc_lite_materials::IfcModel;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// A 4 x 0.3 x 3 layered wall and a 5 x 4 x 0.25 concrete slab, in metres
    pub const MODEL: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('p',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#4=IFCDIRECTION((0.,0.,1.));
#10=IFCMATERIAL('Brick');
#11=IFCMATERIAL('Concrete');
#12=IFCMATERIALLAYER(#10,0.1,$);
#13=IFCMATERIALLAYER(#11,0.2,$);
#14=IFCMATERIALLAYERSET((#12,#13),$);
#15=IFCMATERIALLAYERSETUSAGE(#14,.AXIS2.,.POSITIVE.,0.);
#20=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,4.,0.3);
#21=IFCEXTRUDEDAREASOLID(#20,$,#4,3.);
#22=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#21));
#23=IFCPRODUCTDEFINITIONSHAPE($,$,(#22));
#24=IFCWALL('wall-guid',$,'Wall',$,$,$,#23,$,$);
#30=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,5.,4.);
#31=IFCEXTRUDEDAREASOLID(#30,$,#4,0.25);
#32=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#31));
#33=IFCPRODUCTDEFINITIONSHAPE($,$,(#32));
#34=IFCSLAB('slab-guid',$,'Slab',$,$,$,#33,$,$);
#40=IFCRELASSOCIATESMATERIAL('r1',$,$,$,(#24),#15);
#41=IFCRELASSOCIATESMATERIAL('r2',$,$,$,(#34),#11);
ENDSEC;
END-ISO-10303-21;
"#;

    pub fn app() -> Router {
        let model = IfcModel::from_content(MODEL.to_string()).unwrap();
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            model_path: "memory.ifc".into(),
            request_timeout_secs: 30,
            circle_segments: None,
            cors_origins: vec!["*".into()],
            log_json: false,
        };
        build_router(AppState {
            model: Arc::new(model),
            config: Arc::new(config),
        })
    }

    /// Issue a GET and decode the JSON body
    pub async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
